use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Description Service API",
        version = "1.0.0",
        description = "Product-description-generation backend. Each endpoint forwards one request to an external provider (OpenAI/Gemini vision, Stripe billing, Cloudinary media, D-ID avatars, Azure Speech) and reshapes the response.\n\n**Authentication:** Checkout and account endpoints require a JWT Bearer token.",
        contact(
            name = "Description Service Team",
            email = "support@description-service.com"
        )
    ),
    paths(
        // Auth endpoints
        crate::api::auth::login,
        crate::api::auth::register,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,

        // Analysis
        crate::api::analyze::analyze_image,

        // Checkout
        crate::api::checkout::create_session,
        crate::api::checkout::create_subscription,

        // Generation
        crate::api::generate::generate_image,
        crate::api::generate::generate_video,
        crate::api::generate::generate_voice_sample,

        // Catalog
        crate::api::catalog::get_avatars,
        crate::api::catalog::get_pricing,
        crate::api::catalog::get_config,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::UserInfo,
            crate::models::user::SubscriptionTier,
            crate::models::user::UsageCounters,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,

            // Analysis
            crate::api::analyze::AnalyzeImageRequest,
            crate::services::vision_service::ProductAnalysis,

            // Checkout
            crate::api::checkout::CheckoutRequest,
            crate::api::checkout::VideoCheckoutRequest,
            crate::api::checkout::BulkVideoCheckoutRequest,
            crate::services::stripe_service::CheckoutSessionResponse,

            // Generation
            crate::api::generate::GenerateImageRequest,
            crate::api::generate::GenerateVideoRequest,
            crate::api::generate::VoiceSampleRequest,
            crate::services::did_service::TalkResult,
            crate::services::speech_service::VoiceInfo,

            // Catalog
            crate::models::avatar::Avatar,
            crate::models::plan::Plan,
        )
    ),
    tags(
        (name = "Auth", description = "Authentication and account management. Email/password registration with JWT issuance."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
        (name = "Analyze", description = "Product image analysis via the configured vision provider (OpenAI or Gemini)."),
        (name = "Checkout", description = "Stripe Checkout session creation for plans, subscriptions, and video credits."),
        (name = "Generate", description = "Media generation: product images, talking-avatar videos, and voice samples."),
        (name = "Catalog", description = "Avatar, pricing, and runtime configuration catalogs."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build(),
                ),
            );
        }
    }
}

use actix_web::HttpResponse;

/// JSON index of the v1 API surface, for clients that land on the root.
pub async fn api_index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "description-service",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui/",
        "openapi": "/api-docs/openapi.json",
        "endpoints": {
            "auth": {
                "POST /api/v1/auth/register": "Create an account, returns a bearer JWT",
                "POST /api/v1/auth/login": "Email/password login, returns a bearer JWT",
                "GET /api/v1/auth/verify": "Validate a bearer JWT",
                "GET /api/v1/auth/me": "Current user with tier and usage",
                "DELETE /api/v1/auth/delete-account": "Remove the current account"
            },
            "analyze": {
                "POST /api/v1/analyze-image": "Extract product attributes from a base64 image"
            },
            "checkout": {
                "POST /api/v1/checkout/session": "One-time plan purchase (auth required)",
                "POST /api/v1/checkout/subscription": "Subscription purchase (auth required)",
                "POST /api/v1/checkout/video": "Single avatar video credit (auth required)",
                "POST /api/v1/checkout/bulk-video": "Bulk video credits (auth required)",
                "POST /api/v1/webhooks/stripe": "Stripe event sink"
            },
            "generate": {
                "POST /api/v1/generate/image": "Product marketing image from a prompt",
                "POST /api/v1/generate/video": "Talking-avatar product video",
                "POST /api/v1/generate/voice-sample": "Hosted TTS sample"
            },
            "catalog": {
                "GET /api/v1/avatars": "Avatar presenters",
                "GET /api/v1/pricing": "Plan catalog",
                "GET /api/v1/config": "Public runtime configuration",
                "GET /api/v1/debug": "Environment presence flags"
            },
            "shopify": {
                "GET /shopify/install": "Start the Shopify OAuth flow",
                "GET /shopify/callback": "OAuth callback redirect"
            }
        }
    }))
}

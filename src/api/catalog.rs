use crate::models::{Avatar, Plan};
use crate::services::{
    cloudinary_service, did_service, gemini_service, openai_service, pricing_service,
    speech_service, stripe_service, user_store,
};
use actix_web::HttpResponse;

#[utoipa::path(
    get,
    path = "/api/v1/avatars",
    tag = "Catalog",
    responses(
        (status = 200, description = "Available avatar presenters", body = [Avatar])
    )
)]
pub async fn get_avatars() -> HttpResponse {
    log::info!("🎭 GET /avatars");

    if did_service::is_configured() {
        match did_service::get_presenters_cached().await {
            Ok(avatars) if !avatars.is_empty() => {
                return HttpResponse::Ok().json(serde_json::json!({
                    "success": true,
                    "source": "d-id",
                    "avatars": avatars
                }));
            }
            Ok(_) => log::warn!("⚠️ D-ID returned an empty presenter list, using builtins"),
            Err(e) => log::warn!("⚠️ D-ID presenter fetch failed, using builtins: {}", e),
        }
    }

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "source": "builtin",
        "avatars": did_service::builtin_avatars()
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/pricing",
    tag = "Catalog",
    responses(
        (status = 200, description = "Plan catalog", body = [Plan])
    )
)]
pub async fn get_pricing() -> HttpResponse {
    log::info!("💲 GET /pricing");

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "currency": "usd",
        "plans": pricing_service::plan_catalog()
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/config",
    tag = "Catalog",
    responses(
        (status = 200, description = "Public runtime configuration")
    )
)]
pub async fn get_config() -> HttpResponse {
    log::info!("⚙️ GET /config");

    let providers = serde_json::json!({
        "openai": openai_service::is_configured(),
        "gemini": gemini_service::is_configured(),
        "stripe": stripe_service::is_configured(),
        "cloudinary": cloudinary_service::is_configured(),
        "did": did_service::is_configured(),
        "azure_speech": speech_service::is_configured(),
    });

    // Demo mode: no analysis provider means every flow falls back
    let demo_mode = !openai_service::is_configured() && !gemini_service::is_configured();

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "providers": providers,
        "demo_mode": demo_mode,
        "stripe_publishable_key": std::env::var("STRIPE_PUBLISHABLE_KEY").unwrap_or_default(),
        "voices": speech_service::available_voices()
    }))
}

/// Environment presence flags for troubleshooting. Values are never
/// echoed, only whether each variable is set.
pub async fn get_debug() -> HttpResponse {
    log::info!("🔧 GET /debug");

    let vars = [
        "OPENAI_API_KEY",
        "GEMINI_API_KEY",
        "STRIPE_SECRET_KEY",
        "STRIPE_WEBHOOK_SECRET",
        "STRIPE_PRICE_STARTER",
        "STRIPE_PRICE_PRO",
        "STRIPE_PRICE_ENTERPRISE",
        "STRIPE_PRICE_VIDEO",
        "STRIPE_PRICE_BULK_VIDEO",
        "CLOUDINARY_CLOUD_NAME",
        "CLOUDINARY_UPLOAD_PRESET",
        "DID_API_KEY",
        "AZURE_SPEECH_KEY",
        "AZURE_SPEECH_REGION",
        "SHOPIFY_API_KEY",
        "JWT_SECRET",
        "FRONTEND_URL",
    ];

    let env_flags: serde_json::Map<String, serde_json::Value> = vars
        .iter()
        .map(|name| {
            let set = std::env::var(name).map(|v| !v.is_empty()).unwrap_or(false);
            (name.to_string(), serde_json::Value::Bool(set))
        })
        .collect();

    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "version": env!("CARGO_PKG_VERSION"),
        "registered_users": user_store::count(),
        "env": env_flags
    }))
}

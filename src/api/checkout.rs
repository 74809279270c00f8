use crate::services::auth_service::Claims;
use crate::services::stripe_service::{self, CheckoutSessionResponse};
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CheckoutRequest {
    pub plan: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoCheckoutRequest {
    pub avatar_id: String,
    #[serde(default)]
    pub script: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct BulkVideoCheckoutRequest {
    pub quantity: u32,
}

fn claims_from(req: &HttpRequest) -> Option<Claims> {
    req.extensions().get::<Claims>().cloned()
}

fn session_response(result: Result<CheckoutSessionResponse, String>) -> HttpResponse {
    match result {
        Ok(session) => {
            log::info!("✅ Checkout session ready: {}", session.session_id);
            HttpResponse::Ok().json(session)
        }
        Err(e) if e.starts_with("Unknown plan") => {
            log::warn!("❌ Checkout rejected: {}", e);
            HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": e
            }))
        }
        Err(e) => {
            log::error!("❌ Checkout failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to create checkout session",
                "details": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout/session",
    tag = "Checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Checkout session created", body = CheckoutSessionResponse),
        (status = 400, description = "Unknown plan"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_session(
    req: HttpRequest,
    request: web::Json<CheckoutRequest>,
) -> HttpResponse {
    log::info!("💳 POST /checkout/session - plan: {}", request.plan);

    let claims = claims_from(&req);
    let reference = claims.as_ref().map(|c| c.sub.as_str());

    session_response(
        stripe_service::create_checkout_session(&request.plan, "payment", 1, reference, &[]).await,
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/checkout/subscription",
    tag = "Checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Subscription session created", body = CheckoutSessionResponse),
        (status = 400, description = "Unknown plan"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_subscription(
    req: HttpRequest,
    request: web::Json<CheckoutRequest>,
) -> HttpResponse {
    log::info!("💳 POST /checkout/subscription - plan: {}", request.plan);

    let claims = claims_from(&req);
    let reference = claims.as_ref().map(|c| c.sub.as_str());

    session_response(
        stripe_service::create_checkout_session(&request.plan, "subscription", 1, reference, &[])
            .await,
    )
}

pub async fn create_video_session(
    req: HttpRequest,
    request: web::Json<VideoCheckoutRequest>,
) -> HttpResponse {
    log::info!("💳 POST /checkout/video - avatar: {}", request.avatar_id);

    if request.avatar_id.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "avatarId is required"
        }));
    }

    let claims = claims_from(&req);
    let reference = claims.as_ref().map(|c| c.sub.as_str());

    let mut metadata = vec![("avatar_id".to_string(), request.avatar_id.clone())];
    if let Some(script) = &request.script {
        metadata.push(("script_chars".to_string(), script.len().to_string()));
    }

    session_response(
        stripe_service::create_checkout_session("video", "payment", 1, reference, &metadata).await,
    )
}

pub async fn create_bulk_video_session(
    req: HttpRequest,
    request: web::Json<BulkVideoCheckoutRequest>,
) -> HttpResponse {
    log::info!("💳 POST /checkout/bulk-video - quantity: {}", request.quantity);

    if request.quantity == 0 || request.quantity > 100 {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "quantity must be between 1 and 100"
        }));
    }

    let claims = claims_from(&req);
    let reference = claims.as_ref().map(|c| c.sub.as_str());

    session_response(
        stripe_service::create_checkout_session(
            "bulk-video",
            "payment",
            request.quantity,
            reference,
            &[],
        )
        .await,
    )
}

/// Stripe webhook sink. Events are acknowledged and routed by type;
/// there is no reconciliation beyond the tier upgrade. The shared
/// secret must be configured and the Stripe-Signature header present
/// before any event is processed.
pub async fn stripe_webhook(
    req: HttpRequest,
    body: web::Json<serde_json::Value>,
) -> HttpResponse {
    let event_type = body["type"].as_str().unwrap_or("unknown");
    log::info!("💳 POST /webhooks/stripe - type: {}", event_type);

    let signature = req
        .headers()
        .get("Stripe-Signature")
        .and_then(|h| h.to_str().ok());

    if let Err(e) = stripe_service::verify_webhook_request(
        stripe_service::webhook_secret_configured(),
        signature,
    ) {
        log::warn!("❌ Webhook rejected: {}", e);
        return HttpResponse::Unauthorized().json(serde_json::json!({
            "success": false,
            "error": e.to_string()
        }));
    }

    match stripe_service::handle_webhook_event(&body) {
        Ok(outcome) => HttpResponse::Ok().json(serde_json::json!({
            "received": true,
            "outcome": outcome
        })),
        Err(e) => {
            // Still 200: Stripe retries on non-2xx and the event itself
            // was understood, only the local user was missing.
            log::warn!("⚠️ Webhook processed with error: {}", e);
            HttpResponse::Ok().json(serde_json::json!({
                "received": true,
                "outcome": format!("error: {}", e)
            }))
        }
    }
}

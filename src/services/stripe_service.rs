use crate::models::SubscriptionTier;
use crate::services::user_store;
use crate::utils::error::AppError;
use serde::Serialize;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

pub fn is_configured() -> bool {
    std::env::var("STRIPE_SECRET_KEY").map(|v| !v.is_empty()).unwrap_or(false)
}

fn get_secret_key() -> Result<String, String> {
    std::env::var("STRIPE_SECRET_KEY").map_err(|_| "STRIPE_SECRET_KEY not configured".to_string())
}

fn get_frontend_url() -> String {
    std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Map a plan name to the env var holding its Stripe price id.
pub fn plan_price_env(plan: &str) -> Option<&'static str> {
    match plan.to_lowercase().as_str() {
        "starter" => Some("STRIPE_PRICE_STARTER"),
        "pro" => Some("STRIPE_PRICE_PRO"),
        "enterprise" => Some("STRIPE_PRICE_ENTERPRISE"),
        "video" => Some("STRIPE_PRICE_VIDEO"),
        "bulk-video" => Some("STRIPE_PRICE_BULK_VIDEO"),
        _ => None,
    }
}

fn price_id_for_plan(plan: &str) -> Result<String, String> {
    let env_key = plan_price_env(plan)
        .ok_or_else(|| format!("Unknown plan: {}", plan))?;
    std::env::var(env_key)
        .map_err(|_| format!("{} not configured for plan '{}'", env_key, plan))
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CheckoutSessionResponse {
    pub success: bool,
    pub session_id: String,
    /// Stripe-hosted payment page to redirect the client to
    pub url: String,
}

/// Create a Stripe Checkout session over raw REST. `mode` is "payment"
/// or "subscription"; extra metadata rides along as form pairs.
pub async fn create_checkout_session(
    plan: &str,
    mode: &str,
    quantity: u32,
    client_reference_id: Option<&str>,
    metadata: &[(String, String)],
) -> Result<CheckoutSessionResponse, String> {
    let secret_key = get_secret_key()?;
    let price_id = price_id_for_plan(plan)?;
    let frontend_url = get_frontend_url();

    log::info!("💳 Creating Stripe {} session for plan '{}'", mode, plan);

    let quantity_str = quantity.to_string();
    let success_url = format!("{}/checkout/success?session_id={{CHECKOUT_SESSION_ID}}", frontend_url);
    let cancel_url = format!("{}/checkout/cancel", frontend_url);

    let mut params: Vec<(String, String)> = vec![
        ("mode".to_string(), mode.to_string()),
        ("line_items[0][price]".to_string(), price_id),
        ("line_items[0][quantity]".to_string(), quantity_str),
        ("success_url".to_string(), success_url),
        ("cancel_url".to_string(), cancel_url),
        ("metadata[plan]".to_string(), plan.to_string()),
    ];

    if let Some(reference) = client_reference_id {
        params.push(("client_reference_id".to_string(), reference.to_string()));
    }
    for (key, value) in metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/checkout/sessions", STRIPE_API_BASE))
        .header("Authorization", format!("Bearer {}", secret_key))
        .form(&params)
        .timeout(std::time::Duration::from_secs(30))
        .send()
        .await
        .map_err(|e| format!("Failed to reach Stripe: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let details = response.text().await.unwrap_or_default();
        log::error!("❌ Stripe error {}: {}", status, details);
        return Err(format!("Stripe API error: {}", status));
    }

    let session: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse Stripe response: {}", e))?;

    let session_id = session["id"]
        .as_str()
        .ok_or_else(|| "No session id in Stripe response".to_string())?
        .to_string();
    let url = session["url"]
        .as_str()
        .ok_or_else(|| "No redirect URL in Stripe response".to_string())?
        .to_string();

    log::info!("✅ Checkout session created: {}", session_id);

    Ok(CheckoutSessionResponse {
        success: true,
        session_id,
        url,
    })
}

pub fn webhook_secret_configured() -> bool {
    std::env::var("STRIPE_WEBHOOK_SECRET")
        .map(|v| !v.is_empty())
        .unwrap_or(false)
}

/// Minimal webhook gate: the shared secret must be configured and the
/// request must carry a Stripe-Signature header. The signature itself
/// is not cryptographically verified.
pub fn verify_webhook_request(
    secret_configured: bool,
    signature_header: Option<&str>,
) -> Result<(), AppError> {
    if !secret_configured {
        return Err(AppError::Unauthorized(
            "STRIPE_WEBHOOK_SECRET not configured".to_string(),
        ));
    }
    match signature_header {
        Some(signature) if !signature.trim().is_empty() => Ok(()),
        _ => Err(AppError::Unauthorized(
            "Missing Stripe-Signature header".to_string(),
        )),
    }
}

/// What a webhook event asks us to do, decided before touching the store.
#[derive(Debug, PartialEq)]
pub enum WebhookAction {
    UpgradeTier {
        user_id: String,
        tier: SubscriptionTier,
    },
    Ignore(String),
}

/// Route a Stripe event by type. Only `checkout.session.completed` with a
/// client_reference_id does anything; everything else is acknowledged.
pub fn route_webhook_event(event: &serde_json::Value) -> WebhookAction {
    let event_type = event["type"].as_str().unwrap_or("unknown");

    if event_type != "checkout.session.completed" {
        return WebhookAction::Ignore(event_type.to_string());
    }

    let session = &event["data"]["object"];
    let user_id = match session["client_reference_id"].as_str() {
        Some(id) => id.to_string(),
        None => return WebhookAction::Ignore("completed session without reference".to_string()),
    };

    let tier = session["metadata"]["plan"]
        .as_str()
        .and_then(SubscriptionTier::from_str)
        .unwrap_or(SubscriptionTier::Starter);

    WebhookAction::UpgradeTier { user_id, tier }
}

/// Apply a routed webhook event against the in-memory store.
pub fn handle_webhook_event(event: &serde_json::Value) -> Result<String, String> {
    match route_webhook_event(event) {
        WebhookAction::UpgradeTier { user_id, tier } => {
            user_store::set_tier(&user_id, tier).map_err(|e| e.to_string())?;
            log::info!("💳 User {} upgraded to {}", user_id, tier.as_str());
            Ok(format!("user {} upgraded to {}", user_id, tier.as_str()))
        }
        WebhookAction::Ignore(reason) => {
            log::info!("💳 Webhook acknowledged, no action: {}", reason);
            Ok(format!("ignored: {}", reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UsageCounters, User};

    #[test]
    fn test_plan_price_mapping() {
        assert_eq!(plan_price_env("starter"), Some("STRIPE_PRICE_STARTER"));
        assert_eq!(plan_price_env("PRO"), Some("STRIPE_PRICE_PRO"));
        assert_eq!(plan_price_env("bulk-video"), Some("STRIPE_PRICE_BULK_VIDEO"));
        assert_eq!(plan_price_env("platinum"), None);
        assert_eq!(plan_price_env(""), None);
    }

    #[test]
    fn test_webhook_gate() {
        // Secret configured and header present passes
        assert!(verify_webhook_request(true, Some("t=123,v1=abc")).is_ok());

        // Forged posts without the header are rejected
        let err = verify_webhook_request(true, None).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
        let err = verify_webhook_request(true, Some("  ")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));

        // An unconfigured secret rejects everything
        let err = verify_webhook_request(false, Some("t=123,v1=abc")).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_webhook_routing_ignores_other_events() {
        let event = serde_json::json!({
            "type": "invoice.paid",
            "data": { "object": {} }
        });
        assert_eq!(
            route_webhook_event(&event),
            WebhookAction::Ignore("invoice.paid".to_string())
        );
    }

    #[test]
    fn test_webhook_routing_completed_session() {
        let event = serde_json::json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "client_reference_id": "user-42",
                "metadata": { "plan": "pro" }
            }}
        });
        assert_eq!(
            route_webhook_event(&event),
            WebhookAction::UpgradeTier {
                user_id: "user-42".to_string(),
                tier: SubscriptionTier::Pro,
            }
        );

        // Unknown plan metadata defaults to starter
        let event = serde_json::json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "client_reference_id": "user-42",
                "metadata": { "plan": "video" }
            }}
        });
        assert_eq!(
            route_webhook_event(&event),
            WebhookAction::UpgradeTier {
                user_id: "user-42".to_string(),
                tier: SubscriptionTier::Starter,
            }
        );
    }

    #[test]
    fn test_webhook_upgrades_store_tier() {
        user_store::insert(User {
            user_id: "stripe-user-1".to_string(),
            email: "stripe-user-1@example.com".to_string(),
            name: "Stripe".to_string(),
            password_hash: None,
            tier: SubscriptionTier::Free,
            usage: UsageCounters::default(),
            created_at: chrono::Utc::now(),
            last_login: None,
        })
        .unwrap();

        let event = serde_json::json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "client_reference_id": "stripe-user-1",
                "metadata": { "plan": "enterprise" }
            }}
        });

        handle_webhook_event(&event).unwrap();
        assert_eq!(
            user_store::find_by_id("stripe-user-1").unwrap().tier,
            SubscriptionTier::Enterprise
        );

        // Unknown user surfaces the store error
        let event = serde_json::json!({
            "type": "checkout.session.completed",
            "data": { "object": {
                "client_reference_id": "stripe-user-missing",
                "metadata": { "plan": "pro" }
            }}
        });
        assert!(handle_webhook_event(&event).is_err());
    }
}

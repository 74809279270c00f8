use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

const OAUTH_SCOPES: &str = "read_products,write_products";

#[derive(Debug, Deserialize)]
pub struct InstallQuery {
    pub shop: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub shop: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

fn get_frontend_url() -> String {
    std::env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Shops must be bare `*.myshopify.com` hostnames, nothing else.
pub fn is_valid_shop_domain(shop: &str) -> bool {
    shop.ends_with(".myshopify.com")
        && shop.len() > ".myshopify.com".len()
        && !shop.contains('/')
        && !shop.contains('?')
        && shop
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
}

/// Redirect the merchant to the Shopify authorize screen.
pub async fn install(query: web::Query<InstallQuery>) -> HttpResponse {
    log::info!("🛍️ GET /shopify/install");

    let shop = match query.shop.as_deref() {
        Some(shop) if is_valid_shop_domain(shop) => shop,
        _ => {
            log::warn!("❌ Invalid or missing shop parameter");
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": "A valid *.myshopify.com shop parameter is required"
            }));
        }
    };

    let api_key = match std::env::var("SHOPIFY_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            log::error!("❌ SHOPIFY_API_KEY not configured");
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Shopify integration not configured"
            }));
        }
    };

    let redirect_uri = std::env::var("SHOPIFY_REDIRECT_URI")
        .unwrap_or_else(|_| "http://localhost:3002/shopify/callback".to_string());
    let state = Uuid::new_v4().to_string();

    let authorize_url = format!(
        "https://{}/admin/oauth/authorize?client_id={}&scope={}&redirect_uri={}&state={}",
        shop,
        urlencoding::encode(&api_key),
        urlencoding::encode(OAUTH_SCOPES),
        urlencoding::encode(&redirect_uri),
        state
    );

    log::info!("✅ Redirecting {} to Shopify authorize", shop);

    HttpResponse::Found()
        .append_header(("Location", authorize_url))
        .finish()
}

/// OAuth callback stub: validate the parameters and hand the merchant
/// back to the frontend. Token exchange is not performed here.
pub async fn callback(query: web::Query<CallbackQuery>) -> HttpResponse {
    log::info!("🛍️ GET /shopify/callback");

    let frontend_url = get_frontend_url();

    if let Some(error) = &query.error {
        log::warn!("❌ Shopify OAuth error: {}", error);
        return HttpResponse::Found()
            .append_header((
                "Location",
                format!("{}/shopify-connected?error={}", frontend_url, urlencoding::encode(error)),
            ))
            .finish();
    }

    let (code, shop) = match (&query.code, &query.shop) {
        (Some(code), Some(shop)) if is_valid_shop_domain(shop) => (code, shop),
        _ => {
            log::warn!("❌ Callback missing code or valid shop");
            return HttpResponse::Found()
                .append_header((
                    "Location",
                    format!("{}/shopify-connected?error=invalid_callback", frontend_url),
                ))
                .finish();
        }
    };

    log::info!(
        "✅ Shopify callback for {} (state: {})",
        shop,
        query.state.as_deref().unwrap_or("none")
    );

    let redirect_url = format!(
        "{}/shopify-connected?shop={}&code={}",
        frontend_url,
        urlencoding::encode(shop),
        urlencoding::encode(code)
    );

    HttpResponse::Found()
        .append_header(("Location", redirect_url))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_domain_validation() {
        assert!(is_valid_shop_domain("my-store.myshopify.com"));
        assert!(is_valid_shop_domain("store123.myshopify.com"));

        assert!(!is_valid_shop_domain(".myshopify.com"));
        assert!(!is_valid_shop_domain("example.com"));
        assert!(!is_valid_shop_domain("evil.com/?x=.myshopify.com"));
        assert!(!is_valid_shop_domain("shop.myshopify.com/admin"));
        assert!(!is_valid_shop_domain(""));
    }
}

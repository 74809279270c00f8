use crate::api::metrics;
use crate::services::auth_service;
use crate::services::user_store;
use crate::services::vision_service::{self, ProductAnalysis};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    pub image_base64: String,
    /// "gemini" to prefer Gemini; anything else keeps the default order
    #[serde(default)]
    pub preferred_api: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/analyze-image",
    tag = "Analyze",
    request_body = AnalyzeImageRequest,
    responses(
        (status = 200, description = "Product attributes extracted", body = ProductAnalysis),
        (status = 400, description = "Missing or invalid imageBase64"),
        (status = 500, description = "No provider configured or vendor failure")
    )
)]
pub async fn analyze_image(
    req: HttpRequest,
    request: web::Json<AnalyzeImageRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!(
        "🔍 POST /analyze-image - preferred: {}",
        request.preferred_api.as_deref().unwrap_or("auto")
    );

    // Validate before any vendor call
    if let Err(e) = vision_service::normalize_image_payload(&request.image_base64) {
        log::warn!("❌ Rejected image payload: {}", e);
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": e
        }));
    }

    match vision_service::analyze_image(&request.image_base64, request.preferred_api.as_deref())
        .await
    {
        Ok(analysis) => {
            log::info!("✅ Analysis via {}: {}", analysis.provider, analysis.title);

            // Count usage when the caller sent a valid token; anonymous
            // callers are served without bookkeeping.
            if let Some(claims) = req
                .headers()
                .get("Authorization")
                .and_then(|h| h.to_str().ok())
                .and_then(|h| h.strip_prefix("Bearer "))
                .and_then(|t| auth_service::verify_token(t).ok())
            {
                user_store::record_description(&claims.sub);
            }

            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "analysis": analysis
            }))
        }
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Image analysis failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Image analysis failed",
                "details": e
            }))
        }
    }
}

use crate::api::metrics;
use crate::services::{
    auth_service, cloudinary_service, did_service, gemini_service, speech_service, user_store,
};
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;

// Stand-in media served when the relevant vendor is not configured, so
// the frontend flow stays demonstrable without credentials.
const DEMO_IMAGE_URL: &str =
    "https://res.cloudinary.com/demo/image/upload/v1/samples/ecommerce/leather-bag-gray.jpg";
const DEMO_VIDEO_URL: &str =
    "https://res.cloudinary.com/demo/video/upload/v1/samples/sea-turtle.mp4";
const DEMO_AUDIO_URL: &str =
    "https://res.cloudinary.com/demo/video/upload/v1/samples/cld-sample-video.mp3";

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub prompt: String,
    #[serde(default)]
    pub style: Option<String>,
    /// OAuth bearer for Vertex service-account flows; the API key is
    /// used when absent
    #[serde(default)]
    pub access_token: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoRequest {
    pub script: String,
    pub avatar_id: String,
    #[serde(default)]
    pub voice_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct VoiceSampleRequest {
    pub text: String,
    #[serde(default)]
    pub voice: Option<String>,
}

fn authed_user_id(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .and_then(|t| auth_service::verify_token(t).ok())
        .map(|c| c.sub)
}

#[utoipa::path(
    post,
    path = "/api/v1/generate/image",
    tag = "Generate",
    request_body = GenerateImageRequest,
    responses(
        (status = 200, description = "Generated image URL"),
        (status = 400, description = "Missing prompt")
    )
)]
pub async fn generate_image(request: web::Json<GenerateImageRequest>) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("🎨 POST /generate/image");

    if request.prompt.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "prompt is required"
        }));
    }

    let has_credentials = gemini_service::is_configured() || request.access_token.is_some();
    if !has_credentials || !cloudinary_service::is_configured() {
        log::info!("ℹ️ Image generation unconfigured, serving demo asset");
        return HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "url": DEMO_IMAGE_URL,
            "demo": true
        }));
    }

    let generated = match gemini_service::generate_product_image(
        &request.prompt,
        request.style.as_deref(),
        request.access_token.as_deref(),
    )
    .await
    {
        Ok(generated) => generated,
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Image generation failed: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Image generation failed",
                "details": e
            }));
        }
    };

    match cloudinary_service::upload_base64(
        &generated.image_base64,
        "image/png",
        "image",
        "generated-products",
    )
    .await
    {
        Ok(url) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "url": url,
            "prompt": generated.prompt,
            "demo": false
        })),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Upload of generated image failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to store generated image",
                "details": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/generate/video",
    tag = "Generate",
    request_body = GenerateVideoRequest,
    responses(
        (status = 200, description = "Talk created (or demo payload)"),
        (status = 400, description = "Missing script or unknown avatar")
    )
)]
pub async fn generate_video(
    req: HttpRequest,
    request: web::Json<GenerateVideoRequest>,
) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("🎬 POST /generate/video - avatar: {}", request.avatar_id);

    if request.script.trim().is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "script is required"
        }));
    }

    // Accept any id the avatar catalog advertises: builtins always,
    // plus the live presenter list when D-ID is configured.
    let avatar = match did_service::resolve_avatar(&request.avatar_id).await {
        Ok(Some(avatar)) => avatar,
        Ok(None) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "success": false,
                "error": format!("Unknown avatar: {}", request.avatar_id)
            }));
        }
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Avatar lookup failed: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to resolve avatar",
                "details": e
            }));
        }
    };

    if !did_service::is_configured() {
        log::info!("ℹ️ D-ID unconfigured, serving demo video");
        return HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "talk_id": "demo",
            "status": "done",
            "result_url": DEMO_VIDEO_URL,
            "demo": true
        }));
    }

    let voice_id = request.voice_id.as_deref().unwrap_or(&avatar.voice_id);

    match did_service::create_talk(&request.script, &avatar.source_url, voice_id).await {
        Ok(talk) => {
            if let Some(user_id) = authed_user_id(&req) {
                user_store::record_video(&user_id);
            }
            HttpResponse::Ok().json(talk)
        }
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Video generation failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Video generation failed",
                "details": e
            }))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/generate/voice-sample",
    tag = "Generate",
    request_body = VoiceSampleRequest,
    responses(
        (status = 200, description = "Hosted voice sample URL"),
        (status = 400, description = "Missing text or unknown voice")
    )
)]
pub async fn generate_voice_sample(request: web::Json<VoiceSampleRequest>) -> HttpResponse {
    metrics::increment_request_count();
    log::info!("🎙️ POST /generate/voice-sample");

    let text = request.text.trim();
    if text.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": "text is required"
        }));
    }
    if speech_service::sample_text_too_long(text) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!(
                "text must be {} characters or fewer",
                speech_service::MAX_SAMPLE_CHARS
            )
        }));
    }

    let voice = request.voice.as_deref().unwrap_or(speech_service::DEFAULT_VOICE);
    if !speech_service::is_known_voice(voice) {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "success": false,
            "error": format!("Unknown voice: {}", voice),
            "voices": speech_service::available_voices()
        }));
    }

    if !speech_service::is_configured() || !cloudinary_service::is_configured() {
        log::info!("ℹ️ Speech synthesis unconfigured, serving demo audio");
        return HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "url": DEMO_AUDIO_URL,
            "voice": voice,
            "demo": true
        }));
    }

    let audio = match speech_service::synthesize(text, voice).await {
        Ok(audio) => audio,
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Voice synthesis failed: {}", e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Voice synthesis failed",
                "details": e
            }));
        }
    };

    use base64::Engine;
    let audio_base64 = base64::engine::general_purpose::STANDARD.encode(&audio);

    match cloudinary_service::upload_base64(&audio_base64, "audio/mpeg", "video", "voice-samples")
        .await
    {
        Ok(url) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "url": url,
            "voice": voice,
            "demo": false
        })),
        Err(e) => {
            metrics::increment_error_count();
            log::error!("❌ Upload of voice sample failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "success": false,
                "error": "Failed to store voice sample",
                "details": e
            }))
        }
    }
}

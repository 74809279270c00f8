use crate::services::vision_service::{
    parse_analysis_json, ProductAnalysis, VisionProvider, ANALYSIS_PROMPT,
};
use async_trait::async_trait;
use serde::Serialize;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const VISION_MODEL: &str = "gemini-1.5-flash";
const IMAGE_MODEL: &str = "imagen-3.0-generate-002";

pub fn is_configured() -> bool {
    std::env::var("GEMINI_API_KEY").map(|v| !v.is_empty()).unwrap_or(false)
}

fn get_api_key() -> Result<String, String> {
    std::env::var("GEMINI_API_KEY").map_err(|_| "GEMINI_API_KEY not configured".to_string())
}

/// Analyze a product image with the Gemini generateContent API.
pub async fn analyze_product_image(image_base64: &str) -> Result<ProductAnalysis, String> {
    let api_key = get_api_key()?;

    log::info!("♊ Sending image to Gemini ({})", VISION_MODEL);

    let body = serde_json::json!({
        "contents": [{
            "parts": [
                { "text": ANALYSIS_PROMPT },
                {
                    "inline_data": {
                        "mime_type": "image/jpeg",
                        "data": image_base64
                    }
                }
            ]
        }],
        "generationConfig": {
            "maxOutputTokens": 600,
            "responseMimeType": "application/json"
        }
    });

    let url = format!(
        "{}/models/{}:generateContent?key={}",
        GEMINI_API_BASE, VISION_MODEL, api_key
    );

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .json(&body)
        .timeout(std::time::Duration::from_secs(60))
        .send()
        .await
        .map_err(|e| format!("Failed to reach Gemini: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("Gemini API error: {}", response.status()));
    }

    let completion: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse Gemini response: {}", e))?;

    let content = completion["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| "No content in Gemini response".to_string())?;

    let analysis = parse_analysis_json(content, "gemini")?;
    log::info!("✅ Gemini analysis complete: {}", analysis.title);

    Ok(analysis)
}

#[derive(Debug, Serialize)]
pub struct GeneratedImage {
    /// Raw image bytes, base64-encoded, as returned by the model
    pub image_base64: String,
    pub prompt: String,
}

/// Generate a product marketing image with Imagen. When `access_token`
/// is present the call is authenticated with it instead of the API key
/// (OAuth service-account flows land here).
pub async fn generate_product_image(
    prompt: &str,
    style: Option<&str>,
    access_token: Option<&str>,
) -> Result<GeneratedImage, String> {
    let full_prompt = match style {
        Some(style) if !style.is_empty() => {
            format!("{}. Style: {}, professional product photography", prompt, style)
        }
        _ => format!("{}, professional product photography", prompt),
    };

    log::info!("🎨 Generating product image ({})", IMAGE_MODEL);

    let body = serde_json::json!({
        "instances": [{ "prompt": full_prompt }],
        "parameters": { "sampleCount": 1, "aspectRatio": "1:1" }
    });

    let client = reqwest::Client::new();
    let request = if let Some(token) = access_token {
        client
            .post(format!("{}/models/{}:predict", GEMINI_API_BASE, IMAGE_MODEL))
            .header("Authorization", format!("Bearer {}", token))
    } else {
        let api_key = get_api_key()?;
        client.post(format!(
            "{}/models/{}:predict?key={}",
            GEMINI_API_BASE, IMAGE_MODEL, api_key
        ))
    };

    let response = request
        .json(&body)
        .timeout(std::time::Duration::from_secs(120))
        .send()
        .await
        .map_err(|e| format!("Failed to reach image generation API: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("Image generation API error: {}", response.status()));
    }

    let prediction: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse image generation response: {}", e))?;

    let image_base64 = prediction["predictions"][0]["bytesBase64Encoded"]
        .as_str()
        .ok_or_else(|| "No image bytes in generation response".to_string())?
        .to_string();

    log::info!("✅ Image generated ({} base64 chars)", image_base64.len());

    Ok(GeneratedImage {
        image_base64,
        prompt: full_prompt,
    })
}

pub struct GeminiVision;

#[async_trait]
impl VisionProvider for GeminiVision {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        is_configured()
    }

    async fn analyze(&self, image_base64: &str) -> Result<ProductAnalysis, String> {
        analyze_product_image(image_base64).await
    }
}

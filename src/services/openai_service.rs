use crate::services::vision_service::{
    parse_analysis_json, ProductAnalysis, VisionProvider, ANALYSIS_PROMPT,
};
use async_trait::async_trait;

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const VISION_MODEL: &str = "gpt-4o";

pub fn is_configured() -> bool {
    std::env::var("OPENAI_API_KEY").map(|v| !v.is_empty()).unwrap_or(false)
}

fn get_api_key() -> Result<String, String> {
    std::env::var("OPENAI_API_KEY").map_err(|_| "OPENAI_API_KEY not configured".to_string())
}

/// Analyze a product image with the OpenAI chat completions vision API.
pub async fn analyze_product_image(image_base64: &str) -> Result<ProductAnalysis, String> {
    let api_key = get_api_key()?;

    log::info!("🤖 Sending image to OpenAI ({})", VISION_MODEL);

    let body = serde_json::json!({
        "model": VISION_MODEL,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": ANALYSIS_PROMPT },
                {
                    "type": "image_url",
                    "image_url": {
                        "url": format!("data:image/jpeg;base64,{}", image_base64)
                    }
                }
            ]
        }],
        "max_tokens": 600,
        "response_format": { "type": "json_object" }
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/chat/completions", OPENAI_API_BASE))
        .header("Authorization", format!("Bearer {}", api_key))
        .json(&body)
        .timeout(std::time::Duration::from_secs(60))
        .send()
        .await
        .map_err(|e| format!("Failed to reach OpenAI: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("OpenAI API error: {}", response.status()));
    }

    let completion: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse OpenAI response: {}", e))?;

    let content = completion["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| "No content in OpenAI response".to_string())?;

    let analysis = parse_analysis_json(content, "openai")?;
    log::info!("✅ OpenAI analysis complete: {}", analysis.title);

    Ok(analysis)
}

pub struct OpenAiVision;

#[async_trait]
impl VisionProvider for OpenAiVision {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        is_configured()
    }

    async fn analyze(&self, image_base64: &str) -> Result<ProductAnalysis, String> {
        analyze_product_image(image_base64).await
    }
}

use crate::services::{gemini_service, openai_service};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Prompt shared by every vision provider so responses land in one shape.
pub const ANALYSIS_PROMPT: &str = "You are a product listing assistant. Analyze the \
product in this image and respond with ONLY a JSON object with these fields: \
\"title\" (short product title), \"description\" (2-3 sentence marketing \
description), \"category\" (single product category), \"colors\" (array of \
color names), \"materials\" (array of materials), \"keywords\" (array of 5-10 \
SEO keywords). No markdown, no extra text.";

/// Vendor-independent product attributes returned to the client.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
pub struct ProductAnalysis {
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub provider: String,
}

#[async_trait]
pub trait VisionProvider {
    fn name(&self) -> &'static str;
    fn is_configured(&self) -> bool;
    async fn analyze(&self, image_base64: &str) -> Result<ProductAnalysis, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

/// Static priority list, no retry and no circuit breaking: Gemini when
/// explicitly requested and configured, else OpenAI, else Gemini, else fail.
pub fn select_provider(
    preferred: Option<&str>,
    gemini_configured: bool,
    openai_configured: bool,
) -> Result<ProviderKind, String> {
    if let Some("gemini") = preferred.map(|p| p.to_lowercase()).as_deref() {
        if gemini_configured {
            return Ok(ProviderKind::Gemini);
        }
    }
    if openai_configured {
        return Ok(ProviderKind::OpenAi);
    }
    if gemini_configured {
        return Ok(ProviderKind::Gemini);
    }
    Err("No vision provider configured. Set OPENAI_API_KEY or GEMINI_API_KEY.".to_string())
}

/// Strip an optional data-URL prefix and check the payload is base64.
pub fn normalize_image_payload(image_base64: &str) -> Result<String, String> {
    let trimmed = image_base64.trim();
    if trimmed.is_empty() {
        return Err("imageBase64 is required".to_string());
    }

    let payload = if let Some(rest) = trimmed.strip_prefix("data:") {
        rest.split_once("base64,")
            .map(|(_, data)| data)
            .ok_or_else(|| "Data URL must be base64-encoded".to_string())?
    } else {
        trimmed
    };

    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| format!("imageBase64 is not valid base64: {}", e))?;

    Ok(payload.to_string())
}

/// Parse the model's text output into a ProductAnalysis. Models like to
/// wrap JSON in ``` fences even when told not to, so strip those first.
pub fn parse_analysis_json(text: &str, provider: &str) -> Result<ProductAnalysis, String> {
    let cleaned = text
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let mut analysis: ProductAnalysis = serde_json::from_str(cleaned)
        .map_err(|e| format!("Failed to parse {} analysis: {}", provider, e))?;

    if analysis.title.is_empty() {
        return Err(format!("{} returned an analysis without a title", provider));
    }

    analysis.provider = provider.to_string();
    Ok(analysis)
}

/// Analyze a product image with the first available provider.
pub async fn analyze_image(
    image_base64: &str,
    preferred: Option<&str>,
) -> Result<ProductAnalysis, String> {
    let payload = normalize_image_payload(image_base64)?;

    let gemini = gemini_service::GeminiVision;
    let openai = openai_service::OpenAiVision;

    let kind = select_provider(preferred, gemini.is_configured(), openai.is_configured())?;
    let provider: &dyn VisionProvider = match kind {
        ProviderKind::Gemini => &gemini,
        ProviderKind::OpenAi => &openai,
    };

    log::info!("🔍 Analyzing product image via {}", provider.name());
    provider.analyze(&payload).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_priority() {
        // Preferred Gemini wins when configured
        assert_eq!(
            select_provider(Some("gemini"), true, true).unwrap(),
            ProviderKind::Gemini
        );
        // Preferred Gemini but unconfigured falls through to OpenAI
        assert_eq!(
            select_provider(Some("gemini"), false, true).unwrap(),
            ProviderKind::OpenAi
        );
        // No preference: OpenAI first
        assert_eq!(
            select_provider(None, true, true).unwrap(),
            ProviderKind::OpenAi
        );
        // Gemini is the fallback when OpenAI is missing
        assert_eq!(
            select_provider(None, true, false).unwrap(),
            ProviderKind::Gemini
        );
        // Nothing configured fails
        assert!(select_provider(Some("gemini"), false, false).is_err());
        assert!(select_provider(None, false, false).is_err());
    }

    #[test]
    fn test_normalize_image_payload() {
        let plain = base64::engine::general_purpose::STANDARD.encode(b"fake image bytes");
        assert_eq!(normalize_image_payload(&plain).unwrap(), plain);

        let data_url = format!("data:image/png;base64,{}", plain);
        assert_eq!(normalize_image_payload(&data_url).unwrap(), plain);

        assert!(normalize_image_payload("").is_err());
        assert!(normalize_image_payload("not base64 at all!!!").is_err());
        assert!(normalize_image_payload("data:image/png;notbase64").is_err());
    }

    #[test]
    fn test_parse_analysis_json() {
        let raw = r#"{"title":"Leather Tote","description":"A roomy tote.","category":"Bags","colors":["brown"],"materials":["leather"],"keywords":["tote","bag"]}"#;
        let analysis = parse_analysis_json(raw, "openai").unwrap();
        assert_eq!(analysis.title, "Leather Tote");
        assert_eq!(analysis.provider, "openai");

        // Fenced output still parses
        let fenced = format!("```json\n{}\n```", raw);
        let analysis = parse_analysis_json(&fenced, "gemini").unwrap();
        assert_eq!(analysis.category, "Bags");
        assert_eq!(analysis.provider, "gemini");

        assert!(parse_analysis_json("not json", "openai").is_err());
        assert!(parse_analysis_json(r#"{"title":"","description":"x","category":"y"}"#, "openai").is_err());
    }
}

use serde::Serialize;

pub fn is_configured() -> bool {
    let key = std::env::var("AZURE_SPEECH_KEY").unwrap_or_default();
    let region = std::env::var("AZURE_SPEECH_REGION").unwrap_or_default();
    !key.is_empty() && !region.is_empty()
}

fn get_key() -> Result<String, String> {
    std::env::var("AZURE_SPEECH_KEY").map_err(|_| "AZURE_SPEECH_KEY not configured".to_string())
}

fn get_region() -> Result<String, String> {
    std::env::var("AZURE_SPEECH_REGION")
        .map_err(|_| "AZURE_SPEECH_REGION not configured".to_string())
}

pub const DEFAULT_VOICE: &str = "en-US-JennyNeural";

pub const MAX_SAMPLE_CHARS: usize = 500;

/// Length limit in characters, not bytes: accented scripts for the
/// non-English voices must not hit the cap early.
pub fn sample_text_too_long(text: &str) -> bool {
    text.chars().count() > MAX_SAMPLE_CHARS
}

#[derive(Debug, Serialize, Clone, utoipa::ToSchema)]
pub struct VoiceInfo {
    pub id: String,
    pub name: String,
    pub language: String,
    pub gender: String,
}

/// Neural voices exposed on the voice-sample picker.
pub fn available_voices() -> Vec<VoiceInfo> {
    let catalog = [
        ("en-US-JennyNeural", "Jenny", "en-US", "female"),
        ("en-US-GuyNeural", "Guy", "en-US", "male"),
        ("en-US-DavisNeural", "Davis", "en-US", "male"),
        ("en-GB-SoniaNeural", "Sonia", "en-GB", "female"),
        ("es-ES-ElviraNeural", "Elvira", "es-ES", "female"),
        ("pt-BR-FranciscaNeural", "Francisca", "pt-BR", "female"),
    ];

    catalog
        .iter()
        .map(|(id, name, language, gender)| VoiceInfo {
            id: id.to_string(),
            name: name.to_string(),
            language: language.to_string(),
            gender: gender.to_string(),
        })
        .collect()
}

pub fn is_known_voice(voice_id: &str) -> bool {
    available_voices().iter().any(|v| v.id == voice_id)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build the SSML document for a synthesis request.
pub fn build_ssml(text: &str, voice_id: &str) -> String {
    let language = voice_id
        .splitn(3, '-')
        .take(2)
        .collect::<Vec<_>>()
        .join("-");

    format!(
        "<speak version='1.0' xml:lang='{lang}'>\
         <voice xml:lang='{lang}' name='{voice}'>{text}</voice>\
         </speak>",
        lang = language,
        voice = voice_id,
        text = escape_xml(text)
    )
}

/// Synthesize speech with Azure TTS, returning MP3 bytes.
pub async fn synthesize(text: &str, voice_id: &str) -> Result<Vec<u8>, String> {
    let key = get_key()?;
    let region = get_region()?;

    log::info!("🎙️ Synthesizing {} chars with voice {}", text.len(), voice_id);

    let ssml = build_ssml(text, voice_id);

    let client = reqwest::Client::new();
    let response = client
        .post(format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            region
        ))
        .header("Ocp-Apim-Subscription-Key", key)
        .header("Content-Type", "application/ssml+xml")
        .header("X-Microsoft-OutputFormat", "audio-16khz-128kbitrate-mono-mp3")
        .header("User-Agent", "description-service")
        .body(ssml)
        .timeout(std::time::Duration::from_secs(30))
        .send()
        .await
        .map_err(|e| format!("Failed to reach Azure Speech: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("Azure Speech API error: {}", response.status()));
    }

    let audio = response
        .bytes()
        .await
        .map_err(|e| format!("Failed to read Azure Speech audio: {}", e))?;

    log::info!("✅ Synthesized {} bytes of audio", audio.len());

    Ok(audio.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_catalog() {
        let voices = available_voices();
        assert!(voices.len() >= 5);
        assert!(is_known_voice(DEFAULT_VOICE));
        assert!(!is_known_voice("en-US-NobodyNeural"));
    }

    #[test]
    fn test_sample_length_counts_chars_not_bytes() {
        // 500 two-byte characters is exactly at the limit
        let accented = "é".repeat(MAX_SAMPLE_CHARS);
        assert_eq!(accented.len(), MAX_SAMPLE_CHARS * 2);
        assert!(!sample_text_too_long(&accented));

        assert!(sample_text_too_long(&"é".repeat(MAX_SAMPLE_CHARS + 1)));
        assert!(!sample_text_too_long("short sample"));
    }

    #[test]
    fn test_build_ssml_escapes_and_sets_language() {
        let ssml = build_ssml("Tom & Jerry <3", "pt-BR-FranciscaNeural");
        assert!(ssml.contains("xml:lang='pt-BR'"));
        assert!(ssml.contains("name='pt-BR-FranciscaNeural'"));
        assert!(ssml.contains("Tom &amp; Jerry &lt;3"));
        assert!(!ssml.contains("<3"));
    }
}

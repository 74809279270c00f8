use crate::models::Avatar;
use base64::Engine;
use serde::Serialize;
use std::collections::HashMap;

const DID_API_BASE: &str = "https://api.d-id.com";

pub fn is_configured() -> bool {
    std::env::var("DID_API_KEY").map(|v| !v.is_empty()).unwrap_or(false)
}

fn get_auth_header() -> Result<String, String> {
    let api_key =
        std::env::var("DID_API_KEY").map_err(|_| "DID_API_KEY not configured".to_string())?;
    // D-ID keys are "user:password" pairs sent as basic auth
    Ok(format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(api_key)
    ))
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TalkResult {
    pub success: bool,
    pub talk_id: String,
    /// created | started | done | error
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_url: Option<String>,
    pub demo: bool,
}

/// Create a talking-avatar video and report its status after a single
/// poll. Clients re-query the vendor themselves for completion.
pub async fn create_talk(
    script: &str,
    source_url: &str,
    voice_id: &str,
) -> Result<TalkResult, String> {
    let auth = get_auth_header()?;

    log::info!("🎬 Creating D-ID talk ({} chars of script)", script.len());

    let body = serde_json::json!({
        "source_url": source_url,
        "script": {
            "type": "text",
            "input": script,
            "provider": {
                "type": "microsoft",
                "voice_id": voice_id
            }
        },
        "config": { "fluent": true, "stitch": true }
    });

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/talks", DID_API_BASE))
        .header("Authorization", &auth)
        .json(&body)
        .timeout(std::time::Duration::from_secs(30))
        .send()
        .await
        .map_err(|e| format!("Failed to reach D-ID: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let details = response.text().await.unwrap_or_default();
        log::error!("❌ D-ID error {}: {}", status, details);
        return Err(format!("D-ID API error: {}", status));
    }

    let created: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse D-ID response: {}", e))?;

    let talk_id = created["id"]
        .as_str()
        .ok_or_else(|| "No talk id in D-ID response".to_string())?
        .to_string();

    // Single status poll, no waiting loop
    let poll = client
        .get(format!("{}/talks/{}", DID_API_BASE, talk_id))
        .header("Authorization", &auth)
        .timeout(std::time::Duration::from_secs(15))
        .send()
        .await
        .map_err(|e| format!("Failed to poll D-ID talk: {}", e))?;

    let talk: serde_json::Value = poll
        .json()
        .await
        .map_err(|e| format!("Failed to parse D-ID talk status: {}", e))?;

    let status = talk["status"].as_str().unwrap_or("created").to_string();
    let result_url = talk["result_url"].as_str().map(String::from);

    log::info!("✅ D-ID talk {} status: {}", talk_id, status);

    Ok(TalkResult {
        success: true,
        talk_id,
        status,
        result_url,
        demo: false,
    })
}

/// Built-in presenter catalog served when D-ID is not configured.
pub fn builtin_avatars() -> Vec<Avatar> {
    vec![
        Avatar {
            id: "amy".to_string(),
            name: "Amy".to_string(),
            source_url: "https://create-images-results.d-id.com/DefaultPresenters/Amy_f/image.jpeg".to_string(),
            thumbnail_url: None,
            gender: "female".to_string(),
            voice_id: "en-US-JennyNeural".to_string(),
        },
        Avatar {
            id: "daniel".to_string(),
            name: "Daniel".to_string(),
            source_url: "https://create-images-results.d-id.com/DefaultPresenters/Daniel_m/image.jpeg".to_string(),
            thumbnail_url: None,
            gender: "male".to_string(),
            voice_id: "en-US-GuyNeural".to_string(),
        },
        Avatar {
            id: "lucia".to_string(),
            name: "Lucia".to_string(),
            source_url: "https://create-images-results.d-id.com/DefaultPresenters/Lucia_f/image.jpeg".to_string(),
            thumbnail_url: None,
            gender: "female".to_string(),
            voice_id: "es-ES-ElviraNeural".to_string(),
        },
        Avatar {
            id: "josh".to_string(),
            name: "Josh".to_string(),
            source_url: "https://create-images-results.d-id.com/DefaultPresenters/Josh_m/image.jpeg".to_string(),
            thumbnail_url: None,
            gender: "male".to_string(),
            voice_id: "en-US-DavisNeural".to_string(),
        },
    ]
}

pub fn find_avatar_in(avatars: &[Avatar], avatar_id: &str) -> Option<Avatar> {
    avatars.iter().find(|a| a.id == avatar_id).cloned()
}

pub fn find_builtin_avatar(avatar_id: &str) -> Option<Avatar> {
    find_avatar_in(&builtin_avatars(), avatar_id)
}

/// Resolve an avatar id the same way the catalog advertises them:
/// builtins first, then the live presenter list when D-ID is configured.
pub async fn resolve_avatar(avatar_id: &str) -> Result<Option<Avatar>, String> {
    if let Some(avatar) = find_builtin_avatar(avatar_id) {
        return Ok(Some(avatar));
    }
    if !is_configured() {
        return Ok(None);
    }
    let presenters = get_presenters_cached().await?;
    Ok(find_avatar_in(&presenters, avatar_id))
}

/// Presenter list cache (in-memory)
use lazy_static::lazy_static;
use std::sync::Mutex;

#[derive(Debug, Clone)]
struct CachedPresenters {
    avatars: Vec<Avatar>,
    timestamp: std::time::Instant,
}

lazy_static! {
    static ref PRESENTER_CACHE: Mutex<HashMap<String, CachedPresenters>> =
        Mutex::new(HashMap::new());
}

const CACHE_TTL_SECONDS: u64 = 3600; // 1 hora

/// Fetch the live presenter list with a 1 hour TTL cache.
pub async fn get_presenters_cached() -> Result<Vec<Avatar>, String> {
    {
        let cache = PRESENTER_CACHE.lock().unwrap();
        if let Some(cached) = cache.get("presenters") {
            let elapsed = cached.timestamp.elapsed().as_secs();
            if elapsed < CACHE_TTL_SECONDS {
                log::debug!("📦 Using cached presenter list (age: {}s)", elapsed);
                return Ok(cached.avatars.clone());
            }
        }
    }

    let avatars = get_presenters().await?;

    {
        let mut cache = PRESENTER_CACHE.lock().unwrap();
        cache.insert(
            "presenters".to_string(),
            CachedPresenters {
                avatars: avatars.clone(),
                timestamp: std::time::Instant::now(),
            },
        );
        log::debug!("💾 Cached {} presenters", avatars.len());
    }

    Ok(avatars)
}

/// Fetch the live presenter list from D-ID.
pub async fn get_presenters() -> Result<Vec<Avatar>, String> {
    let auth = get_auth_header()?;

    log::info!("🎭 Fetching presenter list from D-ID");

    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/clips/presenters", DID_API_BASE))
        .header("Authorization", &auth)
        .timeout(std::time::Duration::from_secs(15))
        .send()
        .await
        .map_err(|e| format!("Failed to fetch D-ID presenters: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("D-ID API error: {}", response.status()));
    }

    let listing: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse D-ID presenters: {}", e))?;

    let presenters = listing["presenters"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    let avatars: Vec<Avatar> = presenters
        .iter()
        .filter_map(|p| {
            Some(Avatar {
                id: p["presenter_id"].as_str()?.to_string(),
                name: p["name"].as_str().unwrap_or("Presenter").to_string(),
                source_url: p["image_url"].as_str()?.to_string(),
                thumbnail_url: p["thumbnail_url"].as_str().map(String::from),
                gender: p["gender"].as_str().unwrap_or("unknown").to_string(),
                voice_id: p["voice"]["voice_id"]
                    .as_str()
                    .unwrap_or("en-US-JennyNeural")
                    .to_string(),
            })
        })
        .collect();

    log::info!("✅ Retrieved {} presenters from D-ID", avatars.len());

    Ok(avatars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_avatars_well_formed() {
        let avatars = builtin_avatars();
        assert!(avatars.len() >= 4);
        for avatar in &avatars {
            assert!(!avatar.id.is_empty());
            assert!(avatar.source_url.starts_with("https://"));
            assert!(!avatar.voice_id.is_empty());
        }
    }

    #[test]
    fn test_find_builtin_avatar() {
        assert_eq!(find_builtin_avatar("amy").unwrap().gender, "female");
        assert!(find_builtin_avatar("nobody").is_none());
    }

    #[test]
    fn test_find_avatar_in_live_list() {
        // Ids shaped like the live presenter list, not the builtins
        let live = vec![Avatar {
            id: "v2_public_amber@abc123".to_string(),
            name: "Amber".to_string(),
            source_url: "https://clips-presenters.d-id.com/amber/image.png".to_string(),
            thumbnail_url: None,
            gender: "female".to_string(),
            voice_id: "en-US-JennyNeural".to_string(),
        }];

        let found = find_avatar_in(&live, "v2_public_amber@abc123").unwrap();
        assert_eq!(found.name, "Amber");
        assert!(find_avatar_in(&live, "amy").is_none());
    }

    #[tokio::test]
    async fn test_resolve_avatar_unconfigured_uses_builtins_only() {
        // No DID_API_KEY in the test environment: builtins resolve, live
        // ids do not, and no vendor call is attempted.
        assert!(resolve_avatar("daniel").await.unwrap().is_some());
        assert!(resolve_avatar("v2_public_amber@abc123").await.unwrap().is_none());
    }
}

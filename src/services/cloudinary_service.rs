const CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com/v1_1";

pub fn is_configured() -> bool {
    let cloud = std::env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_default();
    let preset = std::env::var("CLOUDINARY_UPLOAD_PRESET").unwrap_or_default();
    !cloud.is_empty() && !preset.is_empty()
}

fn get_cloud_name() -> Result<String, String> {
    std::env::var("CLOUDINARY_CLOUD_NAME")
        .map_err(|_| "CLOUDINARY_CLOUD_NAME not configured".to_string())
}

fn get_upload_preset() -> Result<String, String> {
    std::env::var("CLOUDINARY_UPLOAD_PRESET")
        .map_err(|_| "CLOUDINARY_UPLOAD_PRESET not configured".to_string())
}

/// Upload a base64 payload via Cloudinary's unsigned upload endpoint and
/// return the hosted URL. `resource_type` is "image" or "video" (audio
/// files upload as "video" on Cloudinary).
pub async fn upload_base64(
    data_base64: &str,
    mime_type: &str,
    resource_type: &str,
    folder: &str,
) -> Result<String, String> {
    let cloud_name = get_cloud_name()?;
    let upload_preset = get_upload_preset()?;

    log::info!(
        "☁️ Uploading {} to Cloudinary ({} base64 chars)",
        resource_type,
        data_base64.len()
    );

    let file_data_url = format!("data:{};base64,{}", mime_type, data_base64);

    let params = [
        ("file", file_data_url.as_str()),
        ("upload_preset", upload_preset.as_str()),
        ("folder", folder),
    ];

    let client = reqwest::Client::new();
    let response = client
        .post(format!(
            "{}/{}/{}/upload",
            CLOUDINARY_API_BASE, cloud_name, resource_type
        ))
        .form(&params)
        .timeout(std::time::Duration::from_secs(60))
        .send()
        .await
        .map_err(|e| format!("Failed to reach Cloudinary: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let details = response.text().await.unwrap_or_default();
        log::error!("❌ Cloudinary error {}: {}", status, details);
        return Err(format!("Cloudinary API error: {}", status));
    }

    let upload: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse Cloudinary response: {}", e))?;

    let secure_url = upload["secure_url"]
        .as_str()
        .ok_or_else(|| "No secure_url in Cloudinary response".to_string())?
        .to_string();

    log::info!("✅ Uploaded to Cloudinary: {}", secure_url);

    Ok(secure_url)
}

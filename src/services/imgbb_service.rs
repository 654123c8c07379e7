// ==================== IMAGE HOSTING ====================
// Uploaded images are forwarded to the external image host; nothing is
// stored locally, only the hosted URL is returned to the client.

use base64::Engine;
use serde::Deserialize;
use std::env;

const IMGBB_API_BASE: &str = "https://api.imgbb.com/1/upload";

#[derive(Debug, Deserialize)]
pub struct ImgbbData {
    pub url: String,
    #[serde(default)]
    pub display_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ImgbbResponse {
    pub data: ImgbbData,
    pub success: bool,
}

/// Uploads image bytes to the host, returning the hosted URL.
pub async fn upload_image(bytes: &[u8], filename: Option<&str>) -> Result<String, String> {
    let api_key = env::var("IMGBB_API_KEY")
        .map_err(|_| "IMGBB_API_KEY not found in environment".to_string())?;

    log::info!(
        "🖼️  Uploading image ({} bytes, name: {})",
        bytes.len(),
        filename.unwrap_or("unnamed")
    );

    // The host accepts base64-encoded payloads as a form field
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);

    let mut form = reqwest::multipart::Form::new().text("image", encoded);
    if let Some(name) = filename {
        form = form.text("name", name.to_string());
    }

    let client = reqwest::Client::new();
    let response = client
        .post(IMGBB_API_BASE)
        .query(&[("key", api_key)])
        .multipart(form)
        .timeout(std::time::Duration::from_secs(30))
        .send()
        .await
        .map_err(|e| format!("Failed to reach image host: {}", e))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(format!("Image host error {}: {}", status, body));
    }

    let upload: ImgbbResponse = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse image host response: {}", e))?;

    if !upload.success {
        return Err("Image host rejected the upload".to_string());
    }

    log::info!("✅ Image hosted at {}", upload.data.url);

    Ok(upload.data.url)
}

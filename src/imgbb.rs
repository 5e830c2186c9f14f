//! imgbb upload client. The free tier stores uploads permanently (32 MB
//! cap), so the returned URL is safe to embed in a Notion page.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::path::Path;

use crate::images::encode_image;

const UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

// One client for the whole wrapper, shared across uploads
static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Upload one image and return its public URL. One multipart POST with
/// fields `key` and `image` (base64 payload); the URL lives at `data.url`
/// in the response.
pub async fn upload(api_key: &str, path: &Path) -> Result<String> {
    let payload = encode_image(path)?;

    let form = reqwest::multipart::Form::new()
        .text("key", api_key.to_string())
        .text("image", payload);

    let response = HTTP
        .post(UPLOAD_URL)
        .multipart(form)
        .send()
        .await
        .context("imgbb upload request failed")?
        .error_for_status()
        .context("imgbb rejected the upload")?;

    let body: serde_json::Value = response.json().await.context("imgbb reply was not JSON")?;
    body["data"]["url"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("imgbb reply missing data.url"))
}

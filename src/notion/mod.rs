//! Notion export: renders a `StructuredAnswer` into an ordered block list
//! and creates one page in the configured database.

pub mod blocks;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::config::Settings;
use crate::imgbb;
use crate::qna::StructuredAnswer;

const API_URL: &str = "https://api.notion.com/v1/pages";
const API_VERSION: &str = "2022-06-28";
const PAGE_ICON: &str = "💡";

// One client for the whole wrapper, shared across page writes
static HTTP: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

/// Create one page for the answered question. The page write itself is a
/// single non-retried call; only the per-image upload sub-step tolerates
/// partial failure.
pub async fn export(
    settings: &Settings,
    answer: &StructuredAnswer,
    session_label: &str,
    image_paths: &[PathBuf],
) -> Result<()> {
    let image_blocks = collect_image_blocks(settings, image_paths).await;
    let children = blocks::assemble(answer, image_blocks);
    let body = page_body(&settings.notion_database_id, answer, session_label, children);

    let response = HTTP
        .post(API_URL)
        .bearer_auth(&settings.notion_api_key)
        .header("Notion-Version", API_VERSION)
        .json(&body)
        .send()
        .await
        .context("Notion page creation request failed")?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        anyhow::bail!("Notion page creation failed ({status}): {message}");
    }

    tracing::info!("Saved \"{}\" to Notion", answer.title);
    Ok(())
}

/// Upload each image independently. A missing imgbb key skips uploads with
/// a warning; an individual failure becomes a placeholder block. Neither
/// aborts the export.
async fn collect_image_blocks(settings: &Settings, image_paths: &[PathBuf]) -> Vec<Value> {
    if image_paths.is_empty() {
        return Vec::new();
    }

    if settings.imgbb_api_key.is_empty() {
        tracing::warn!("imgbb API key is not configured; skipping image upload");
        return Vec::new();
    }

    let mut image_blocks = Vec::new();
    for path in image_paths {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let upload_result = imgbb::upload(&settings.imgbb_api_key, path).await;
        image_blocks.push(image_block_for(&file_name, upload_result));
    }
    image_blocks
}

/// One block per attempted image: the hosted URL on success, a placeholder
/// naming the file on failure. The failure arm absorbs the error so the
/// remaining images and the page write still proceed.
fn image_block_for(file_name: &str, upload_result: Result<String>) -> Value {
    match upload_result {
        Ok(url) => {
            tracing::info!("Uploaded {} to {}", file_name, url);
            blocks::external_image(&url)
        }
        Err(e) => {
            tracing::warn!("Upload of {} failed: {:#}", file_name, e);
            blocks::upload_failed_placeholder(file_name)
        }
    }
}

fn page_body(
    database_id: &str,
    answer: &StructuredAnswer,
    session_label: &str,
    children: Vec<Value>,
) -> Value {
    let tags: Vec<Value> = answer.tags.iter().map(|tag| json!({ "name": tag })).collect();

    json!({
        "parent": { "database_id": database_id },
        "icon": { "type": "emoji", "emoji": PAGE_ICON },
        "properties": {
            "title": {
                "title": [{ "type": "text", "text": { "content": answer.title } }]
            },
            "Tags": { "multi_select": tags },
            "Session": {
                "rich_text": [{ "type": "text", "text": { "content": session_label } }]
            },
        },
        "children": children,
    })
}

pub mod anthropic;
pub mod dispatch;
mod error;
pub mod gemini;
pub mod openai;

pub use dispatch::{dispatch, resolve, ModelParams, ProviderKind};
pub use error::LlmError;

use async_trait::async_trait;

/// One inline image in a multimodal prompt: a media type plus the
/// base64-encoded payload. Providers that take data URIs get `data_uri()`;
/// the others consume the two fields directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub media_type: String,
    pub data: String,
}

impl ImagePart {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// User-side request body. Image order is preserved exactly as entered.
#[derive(Debug, Clone)]
pub enum Prompt {
    Text(String),
    Multimodal { text: String, images: Vec<ImagePart> },
}

impl Prompt {
    pub fn text(&self) -> &str {
        match self {
            Prompt::Text(text) => text,
            Prompt::Multimodal { text, .. } => text,
        }
    }

    pub fn images(&self) -> &[ImagePart] {
        match self {
            Prompt::Text(_) => &[],
            Prompt::Multimodal { images, .. } => images,
        }
    }
}

/// A chat-capable model bound to one provider and one model id.
/// `complete` performs exactly one logical request (plus the provider's own
/// transient retries) and returns the raw text output; no streaming.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn model(&self) -> &str;

    async fn complete(&self, system: &str, prompt: &Prompt) -> Result<String, LlmError>;
}

/// Shared request loop for the HTTP providers: up to `max_retries` extra
/// attempts on transient failures, anything else surfaces immediately.
pub(crate) async fn send_with_retry(
    build: impl Fn() -> reqwest::RequestBuilder,
    max_retries: u32,
    model: &str,
) -> Result<serde_json::Value, LlmError> {
    let mut attempt: u32 = 0;
    loop {
        let err = match build().send().await {
            Ok(resp) => {
                let status = resp.status();
                if status.is_success() {
                    return resp.json().await.map_err(LlmError::ApiRequestFailed);
                }
                let message = resp.text().await.unwrap_or_default();
                LlmError::Provider {
                    status: status.as_u16(),
                    message,
                }
            }
            Err(e) => LlmError::ApiRequestFailed(e),
        };

        if err.is_transient() && attempt < max_retries {
            attempt += 1;
            tracing::warn!(
                "Request to {} failed (retry {}/{}): {}",
                model,
                attempt,
                max_retries,
                err
            );
        } else {
            return Err(err);
        }
    }
}

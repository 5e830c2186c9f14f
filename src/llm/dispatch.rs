use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Settings;
use crate::llm::anthropic::AnthropicModel;
use crate::llm::gemini::GeminiModel;
use crate::llm::openai::OpenAiModel;
use crate::llm::{ChatModel, LlmError};

/// Closed set of supported providers. Adding a provider means adding a
/// variant and a branch in `resolve`, not a new open type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    Gemini,
}

/// Request parameters chosen per provider family at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    pub temperature: Option<f32>,
    pub max_retries: u32,
}

static O_SERIES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^o\d").expect("valid regex"));

/// Pure mapping from model name to provider and parameters. Ordered,
/// case-sensitive, first match wins; an unrecognized name is an immediate
/// error with no network attempt.
pub fn resolve(model: &str) -> Result<(ProviderKind, ModelParams), LlmError> {
    if model.starts_with("claude") {
        Ok((
            ProviderKind::Anthropic,
            ModelParams {
                temperature: Some(0.0),
                max_retries: 3,
            },
        ))
    } else if model.starts_with("gpt") {
        Ok((
            ProviderKind::OpenAi,
            ModelParams {
                temperature: Some(0.0),
                max_retries: 3,
            },
        ))
    } else if O_SERIES.is_match(model) {
        // Reasoning models reject an explicit temperature override
        Ok((
            ProviderKind::OpenAi,
            ModelParams {
                temperature: None,
                max_retries: 3,
            },
        ))
    } else if model.starts_with("gemini") {
        Ok((
            ProviderKind::Gemini,
            ModelParams {
                temperature: Some(0.0),
                max_retries: 3,
            },
        ))
    } else {
        Err(LlmError::UnknownModel(model.to_string()))
    }
}

/// Bind a model name to a client handle using the matching API key.
/// Allocates the handle only; no network call happens here.
pub fn dispatch(model: &str, settings: &Settings) -> Result<Box<dyn ChatModel>, LlmError> {
    let (kind, params) = resolve(model)?;

    let handle: Box<dyn ChatModel> = match kind {
        ProviderKind::Anthropic => {
            let key = require_key(&settings.anthropic_api_key, "anthropic")?;
            Box::new(AnthropicModel::new(model, key, params))
        }
        ProviderKind::OpenAi => {
            let key = require_key(&settings.openai_api_key, "openai")?;
            Box::new(OpenAiModel::new(model, key, params))
        }
        ProviderKind::Gemini => {
            let key = require_key(&settings.google_api_key, "gemini")?;
            Box::new(GeminiModel::new(model, key, params))
        }
    };

    Ok(handle)
}

fn require_key(key: &str, provider: &'static str) -> Result<String, LlmError> {
    if key.is_empty() {
        Err(LlmError::MissingApiKey(provider))
    } else {
        Ok(key.to_string())
    }
}

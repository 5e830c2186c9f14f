use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Missing API key for {0} (set it in the config file or environment)")]
    MissingApiKey(&'static str),

    #[error("API request failed: {0}")]
    ApiRequestFailed(#[from] reqwest::Error),

    #[error("Provider error {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

impl LlmError {
    /// Transient failures are eligible for the fixed provider-level retry:
    /// transport errors, 429, and 5xx. Everything else fails immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Provider { status, .. } => *status == 429 || *status >= 500,
            LlmError::ApiRequestFailed(e) => e
                .status()
                .map(|s| s.as_u16() == 429 || s.is_server_error())
                .unwrap_or(true),
            _ => false,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Provider { status, .. } => Some(*status),
            LlmError::ApiRequestFailed(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned {status}: {body}")]
    Status {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{provider} response invalid: {message}")]
    InvalidResponse { provider: String, message: String },

    #[error("{provider} returned an empty suggestion")]
    EmptySuggestion { provider: String },

    #[error("{provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("all providers failed: {}", failures.join("; "))]
    ChainExhausted { failures: Vec<String> },

    #[error("assist not configured: {0}")]
    NotConfigured(String),
}

impl AssistError {
    pub fn invalid_response(provider: &str, message: impl Into<String>) -> Self {
        AssistError::InvalidResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Failures that might succeed when asked again later.
    pub fn is_transient(&self) -> bool {
        match self {
            AssistError::Http { .. } | AssistError::Timeout { .. } => true,
            AssistError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

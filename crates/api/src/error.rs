//! Error types for the HAP API client.

/// Result type for API operations.
pub type HapResult<T> = Result<T, HapError>;

/// Error types that can occur when talking to the HAP open API.
#[derive(Debug, thiserror::Error)]
pub enum HapError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream API reported a failure (`error_code != 1` or
    /// `success == false`).
    #[error("API error: {message}")]
    Api {
        code: Option<i64>,
        message: String,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl HapError {
    /// Upstream failure carrying the platform's numeric error code.
    pub fn upstream(code: impl Into<Option<i64>>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }
}

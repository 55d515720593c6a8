use reqwest::StatusCode;
use thiserror::Error;

/// Why an advice request produced no usable text.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("no Gemini API key configured")]
    MissingApiKey,
    #[error("HTTP client unavailable")]
    ClientUnavailable,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("API returned an error: {0}")]
    Api(String),
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("prompt was blocked: {0}")]
    Blocked(String),
    #[error("API returned empty response")]
    EmptyResponse,
}

impl AdvisoryError {
    /// Whether the failure is local configuration rather than the remote side.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::ClientUnavailable)
    }
}

//! Errors raised by a playback service.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Failures of a remote read or write.
///
/// "Nothing is playing" is not an error: reads return `Ok(None)` for that case.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Token missing, expired or lacking scope (401/403)
    #[error("Authorization failed: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The service has no device to send the command to
    #[error("No active device")]
    NoActiveDevice,

    #[error("Rate limit exceeded, try again later")]
    RateLimited,

    #[error("Playback API error (code {code}): {message}")]
    Api { code: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request cannot be expressed against this service (e.g. naming a `local:` URI)
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Failure injected by the in-memory service
    #[error("Simulated failure: {0}")]
    Simulated(String),
}

impl PlaybackError {
    /// Maps an HTTP status and the service's error reason to a variant.
    pub fn from_status_code(code: u16, reason: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match (code, reason) {
            (_, Some("NO_ACTIVE_DEVICE")) => Self::NoActiveDevice,
            (401 | 403, _) => Self::Unauthorized(message),
            (404, _) => Self::NotFound(message),
            (429, _) => Self::RateLimited,
            _ => Self::Api { code, message },
        }
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

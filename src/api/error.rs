//! Typed error for the archive API boundary

use thiserror::Error;

/// Status-coded client error.
///
/// `status == 0` means the request never produced an HTTP response
/// (DNS, connection refused, aborted). Anything in 400..=599 carries the
/// server's status code and a human-readable message.
#[derive(Debug, Clone, Error)]
#[error("api error ({status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    /// Transport-level failure with no HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
        }
    }

    /// Server-reported failure.
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // A status() here means the body failed to decode after a successful
        // exchange; keep the code so callers can still tell those apart.
        match err.status() {
            Some(code) => Self::status(code.as_u16(), err.to_string()),
            None => Self::transport(err.to_string()),
        }
    }
}

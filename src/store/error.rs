//! Error classification for remote store calls.

use thiserror::Error;

/// Failure of a remote store operation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Server-side or rate-limit failure that may succeed when retried.
    #[error("transient error (HTTP {status}): {message}")]
    Transient {
        /// HTTP status code.
        status: u16,
        /// Server message.
        message: String,
    },
    /// Request rejected by the store (quota, malformed payload, not found...).
    #[error("permanent error (HTTP {status}): {message}")]
    Permanent {
        /// HTTP status code.
        status: u16,
        /// Server message.
        message: String,
    },
    /// Connection, timeout or other transport failure.
    #[error("transport error: {0}")]
    Transport(String),
    /// Response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
    /// Credentials could not be loaded or exchanged for a token.
    #[error("authentication error: {0}")]
    Auth(String),
}

impl StoreError {
    /// What: Classify an HTTP error status.
    ///
    /// Inputs:
    /// - `status`: Non-success HTTP status code.
    /// - `message`: Body or reason text to keep for the report.
    ///
    /// Output:
    /// - `Transient` for 5xx, 408 and 429; `Permanent` for everything else.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        if status >= 500 || status == 408 || status == 429 {
            Self::Transient { status, message }
        } else {
            Self::Permanent { status, message }
        }
    }

    /// Whether retrying the same call may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::Transport(_))
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: HTTP statuses map onto the retry taxonomy.
    ///
    /// Inputs:
    /// - 500, 503, 429, 408 and 400, 403, 404.
    ///
    /// Output:
    /// - The first group is transient, the second permanent.
    fn status_classification() {
        for status in [500, 503, 429, 408] {
            assert!(StoreError::from_status(status, "x").is_transient(), "{status}");
        }
        for status in [400, 403, 404] {
            assert!(!StoreError::from_status(status, "x").is_transient(), "{status}");
        }
        assert!(StoreError::Transport("reset".into()).is_transient());
        assert!(!StoreError::Decode("bad json".into()).is_transient());
    }
}

//! Error types for the state tracker.
//!
//! Almost nothing in this crate fails: malformed or unexpected protocol input
//! is tolerated and ignored. The two exceptions are an unsupported
//! casemapping (folding with a guessed mapping would corrupt every key) and a
//! byte stream that can no longer be decoded.

use thiserror::Error;

/// Convenience type alias for Results using [`StateError`].
pub type Result<T, E = StateError> = std::result::Result<T, E>;

/// Top-level state tracker errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StateError {
    /// A casemapping other than `ascii` or `rfc1459` was requested.
    #[error("invalid casemapping: {0}")]
    InvalidCasemapping(String),

    /// The inbound byte stream can no longer be decoded.
    #[error("disconnected: {reason}")]
    Disconnected {
        /// Why the stream was abandoned.
        reason: DisconnectReason,
    },
}

impl StateError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCasemapping(_) => "invalid_casemapping",
            Self::Disconnected { .. } => "disconnected",
        }
    }
}

/// Reason attached to [`StateError::Disconnected`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DisconnectReason {
    /// An empty push: the peer closed the stream.
    #[error("end of stream")]
    Eof,

    /// A buffered line grew past the line ceiling.
    #[error("line too long: {actual} bytes (limit: {limit})")]
    LineTooLong {
        /// Bytes buffered without a line terminator.
        actual: usize,
        /// Maximum allowed line length.
        limit: usize,
    },

    /// The underlying reader failed.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for DisconnectReason {
    fn from(err: std::io::Error) -> Self {
        DisconnectReason::Io(err.to_string())
    }
}

impl From<DisconnectReason> for StateError {
    fn from(reason: DisconnectReason) -> Self {
        StateError::Disconnected { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = StateError::InvalidCasemapping("strict-rfc1459".to_string());
        assert_eq!(err.to_string(), "invalid casemapping: strict-rfc1459");

        let err: StateError = DisconnectReason::Eof.into();
        assert_eq!(err.to_string(), "disconnected: end of stream");

        let err: StateError = DisconnectReason::LineTooLong {
            actual: 9000,
            limit: 8703,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "disconnected: line too long: 9000 bytes (limit: 8703)"
        );
    }

    #[test]
    fn test_error_code() {
        assert_eq!(
            StateError::InvalidCasemapping(String::new()).error_code(),
            "invalid_casemapping"
        );
        assert_eq!(
            StateError::from(DisconnectReason::Eof).error_code(),
            "disconnected"
        );
    }
}

//! Error types for qage operations.
//!
//! This module provides the unified error type for key parsing and the
//! hybrid KEM engine. The one deliberately non-fatal variant is
//! [`QageError::NotForMe`]: callers trying several identities against a file
//! are expected to match on it and move on rather than abort.

use thiserror::Error;

use crate::core::bech32::Bech32Error;

/// Errors that can occur when working with qage keys and stanzas.
#[derive(Debug, Error)]
pub enum QageError {
    /// The checksummed text encoding is invalid.
    #[error("invalid encoding: {0}")]
    Encoding(#[from] Bech32Error),

    /// The human-readable prefix does not identify the expected key kind.
    #[error("invalid prefix {actual:?}, expected {expected:?}")]
    UnexpectedHrp {
        /// The prefix required for this key kind.
        expected: &'static str,
        /// The prefix actually present.
        actual: String,
    },

    /// The decoded payload is empty, missing even the suite tag.
    #[error("empty key payload")]
    EmptyPayload,

    /// The suite tag is not recognized. Signals version skew between the
    /// encoder and this implementation.
    #[error("unsupported suite {0}")]
    UnknownSuite(u8),

    /// The payload size does not match the suite's fixed key sizes.
    /// Signals corruption or truncation of an otherwise valid encoding.
    #[error("invalid {kind} length {actual}, expected {expected}")]
    InvalidLength {
        /// What was being parsed.
        kind: &'static str,
        /// The length required by the suite.
        expected: usize,
        /// The length actually present.
        actual: usize,
    },

    /// The identity file line does not start with the expected marker or is
    /// a blank/comment line.
    #[error("invalid identity file line")]
    InvalidFileLine,

    /// Key material was rejected by the underlying exchange primitive.
    #[error("invalid key material")]
    InvalidKey,

    /// The stanza body is shorter than the fixed-size fields it must carry.
    #[error("stanza too short")]
    StanzaTooShort,

    /// The stanza does not apply to this identity. Non-fatal: skip it and
    /// try the next identity or stanza.
    #[error("stanza does not match this identity")]
    NotForMe,

    /// A cryptographic primitive failed. Intentionally vague.
    #[error("cryptographic operation failed")]
    Crypto,
}

/// Result type alias for qage operations.
pub type QageResult<T> = Result<T, QageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QageError::UnknownSuite(7);
        assert_eq!(err.to_string(), "unsupported suite 7");

        let err = QageError::InvalidLength {
            kind: "recipient",
            expected: 1216,
            actual: 12,
        };
        assert_eq!(err.to_string(), "invalid recipient length 12, expected 1216");

        let err = QageError::NotForMe;
        assert_eq!(err.to_string(), "stanza does not match this identity");
    }

    #[test]
    fn test_encoding_error_conversion() {
        let err: QageError = Bech32Error::BadChecksum.into();
        assert!(matches!(err, QageError::Encoding(Bech32Error::BadChecksum)));
        assert_eq!(err.to_string(), "invalid encoding: checksum mismatch");
    }
}

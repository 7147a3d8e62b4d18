//! Cryptographic suite identifiers and fixed key sizes.
//!
//! A suite names one concrete combination of a classical exchange and a
//! post-quantum encapsulation, together with the fixed sizes of every piece
//! of key material it serializes. The enum is closed: every dispatch site in
//! the crate matches it exhaustively, so adding a suite is a compile-time
//! obligation rather than a silent default branch.

use core::fmt::{self, Display};

use crate::core::error::{QageError, QageResult};

/// Size of an X25519 public or secret key in bytes.
pub const X25519_KEY_SIZE: usize = 32;

/// Size of an ML-KEM-768 encapsulation (public) key in bytes.
pub const MLKEM768_PUBLIC_KEY_SIZE: usize = 1184;

/// Size of an ML-KEM-768 decapsulation (secret) key in bytes.
pub const MLKEM768_SECRET_KEY_SIZE: usize = 2400;

/// Size of an ML-KEM-768 ciphertext in bytes.
pub const MLKEM768_CIPHERTEXT_SIZE: usize = 1088;

/// Size of the derived wrap key in bytes.
pub const WRAP_KEY_SIZE: usize = 32;

/// Identifies the cryptographic suite of a recipient or identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suite {
    /// X25519 ECDH combined with ML-KEM-768, hybrid wire version 1.
    HybridX25519MlKem768,
}

impl Suite {
    /// Returns the wire tag byte that prefixes serialized key material.
    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::HybridX25519MlKem768 => 1,
        }
    }

    /// Resolves a wire tag byte back to a suite.
    ///
    /// # Errors
    ///
    /// Returns [`QageError::UnknownSuite`] for any unrecognized tag; there
    /// is no default suite.
    pub fn from_tag(tag: u8) -> QageResult<Self> {
        match tag {
            1 => Ok(Self::HybridX25519MlKem768),
            other => Err(QageError::UnknownSuite(other)),
        }
    }

    /// Length of a recipient payload after the suite tag is stripped.
    #[must_use]
    pub const fn recipient_payload_len(self) -> usize {
        match self {
            Self::HybridX25519MlKem768 => X25519_KEY_SIZE + MLKEM768_PUBLIC_KEY_SIZE,
        }
    }

    /// Length of an identity payload after the suite tag is stripped.
    #[must_use]
    pub const fn identity_payload_len(self) -> usize {
        match self {
            Self::HybridX25519MlKem768 => X25519_KEY_SIZE + MLKEM768_SECRET_KEY_SIZE,
        }
    }
}

impl Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HybridX25519MlKem768 => write!(f, "X25519+ML-KEM-768"),
        }
    }
}

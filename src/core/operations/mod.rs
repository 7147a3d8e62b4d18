//! Cryptographic operations for qage.
//!
//! This module provides the machinery behind the domain types:
//!
//! - [`hkdf`] - HMAC-based extract-and-expand key derivation
//! - [`hybrid`] - Hybrid X25519 + ML-KEM-768 wrap/unwrap
//! - [`keygen`] - Key generation and public-key derivation

pub mod hkdf;
pub(crate) mod hybrid;
pub(crate) mod keygen;

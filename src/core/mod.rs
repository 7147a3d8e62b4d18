//! Core qage types and operations.
//!
//! This module provides the fundamental building blocks:
//!
//! - [`bech32`] - Checksummed human-readable key encoding
//! - [`error`] - Error types for qage operations
//! - [`suite`] - Cryptographic suite identifiers and fixed key sizes
//! - [`types`] - Recipient, identity, and stanza records
//! - [`operations`] - Key derivation and the hybrid KEM engine

pub mod bech32;
pub mod error;
pub mod operations;
pub mod suite;
pub mod types;

// Re-export commonly used items
pub use error::{QageError, QageResult};
pub use suite::Suite;

//! qage domain types.
//!
//! This module provides the records the hybrid KEM engine operates on:
//!
//! - [`Recipient`] - Public encryption target
//! - [`Identity`] - Private decryption capability with its cached recipient
//! - [`Stanza`] - The wire container carrying one wrapped file key

mod identity;
mod recipient;
mod stanza;

pub use identity::{Identity, IDENTITY_FILE_MARKER, IDENTITY_HRP};
pub use recipient::{Recipient, RECIPIENT_HRP};
pub use stanza::{Stanza, STANZA_TAG, STANZA_VERSION_1};

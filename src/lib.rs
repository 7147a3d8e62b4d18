//! Post-quantum hybrid recipients and identities for age.
//!
//! qage provides an [`Identity`]/[`Recipient`] pair that wraps a symmetric
//! file key by combining X25519 ECDH with ML-KEM-768, so that both the
//! classical and the post-quantum component must be broken to recover the
//! key. The same capability is exposed to external tools as an
//! `age-plugin-qage` binary speaking the age plugin stdio protocol.
//!
//! # Quick Start
//!
//! ```rust
//! use qage::{Identity, Recipient};
//!
//! // Generate a new identity; the public recipient is derived eagerly.
//! let identity = Identity::generate()?;
//! let recipient = identity.recipient();
//!
//! // Serialize both for storage.
//! let recipient_str = recipient.to_string();
//! let identity_line = identity.to_file_line(Some("laptop"));
//! assert!(recipient_str.starts_with("qage1"));
//! assert!(identity_line.starts_with("QAGE-SECRET-KEY-1 "));
//!
//! // Wrap and unwrap a file key.
//! let file_key = [0x42u8; 16];
//! let stanzas = recipient.wrap(&file_key)?;
//! let recovered = identity.unwrap(&stanzas)?;
//! assert_eq!(recovered, file_key);
//! # Ok::<(), qage::QageError>(())
//! ```
//!
//! # Key Formats
//!
//! | Kind | Format |
//! |------|--------|
//! | Recipient | `qage1{data}` |
//! | Identity | `qagseck1{data}` |
//! | Identity file line | `QAGE-SECRET-KEY-1 {identity} [# comment]` |
//!
//! Both encodings are checksummed base-32 text carrying a suite tag byte
//! followed by the suite's fixed-size key material.
//!
//! # Security
//!
//! - Secret key material is zeroized on drop
//! - `Debug` output redacts sensitive key material
//! - Constant-time comparison for identities
//! - Every key or stanza either parses fully or fails; nothing partial
//!
//! # Modules
//!
//! - [`core`] - Codec, key types, key derivation, and the hybrid KEM engine
//! - [`plugin`] - The stdio protocol adapter behind `age-plugin-qage`

pub mod core;
pub mod plugin;

// Re-export commonly used items at crate root
pub use self::core::error::{QageError, QageResult};
pub use self::core::suite::Suite;
pub use self::core::types::{Identity, Recipient, Stanza};

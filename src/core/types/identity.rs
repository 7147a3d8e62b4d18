//! Private decryption capability for one suite.
//!
//! Serialized form: checksummed text under the `qagseck` prefix, carrying
//! one suite tag byte followed by the X25519 secret key and the ML-KEM-768
//! decapsulation key. The corresponding [`Recipient`] is derived once at
//! construction and cached for the identity's lifetime; it is never
//! recomputed or mutated, so reads need no synchronization.
//!
//! # Security
//!
//! - Secret key material is zeroized on drop
//! - `Debug` output redacts the secrets
//! - Equality comparison is constant-time

use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::core::bech32;
use crate::core::error::{QageError, QageResult};
use crate::core::operations::{hybrid, keygen};
use crate::core::suite::{Suite, X25519_KEY_SIZE};
use crate::core::types::{Recipient, Stanza};

/// Human-readable prefix of an encoded identity.
pub const IDENTITY_HRP: &str = "qagseck";

/// Marker that opens an identity file line.
pub const IDENTITY_FILE_MARKER: &str = "QAGE-SECRET-KEY-1";

/// A qage private identity for decryption.
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct Identity {
    #[zeroize(skip)]
    suite: Suite,
    x25519_secret: [u8; X25519_KEY_SIZE],
    mlkem_secret: Vec<u8>,
    #[zeroize(skip)]
    recipient: Recipient,
}

impl Identity {
    /// Generates a fresh identity using the default suite.
    ///
    /// # Errors
    ///
    /// Returns [`QageError::Crypto`] if the system RNG fails.
    pub fn generate() -> QageResult<Self> {
        Self::generate_for(Suite::HybridX25519MlKem768)
    }

    /// Generates a fresh identity for the given suite.
    ///
    /// # Errors
    ///
    /// Returns [`QageError::Crypto`] if the system RNG fails.
    pub fn generate_for(suite: Suite) -> QageResult<Self> {
        match suite {
            Suite::HybridX25519MlKem768 => {
                let (x25519_secret, x25519_pub) = keygen::generate_x25519()?;
                let (mlkem_secret, mlkem_pub) = keygen::generate_mlkem768();
                Ok(Self {
                    suite,
                    x25519_secret,
                    mlkem_secret,
                    recipient: Recipient::new(suite, x25519_pub, mlkem_pub),
                })
            }
        }
    }

    /// Reconstructs an identity from its parsed key material, deriving and
    /// caching the recipient.
    fn from_parts(
        suite: Suite,
        x25519_secret: [u8; X25519_KEY_SIZE],
        mlkem_secret: Vec<u8>,
    ) -> QageResult<Self> {
        let recipient = match suite {
            Suite::HybridX25519MlKem768 => {
                let x25519_pub = keygen::x25519_public_key(&x25519_secret);
                let mlkem_pub = keygen::mlkem768_public_key(&mlkem_secret)?;
                Recipient::new(suite, x25519_pub, mlkem_pub)
            }
        };
        Ok(Self {
            suite,
            x25519_secret,
            mlkem_secret,
            recipient,
        })
    }

    /// Returns the cryptographic suite of this identity.
    #[must_use]
    pub fn suite(&self) -> Suite {
        self.suite
    }

    /// Returns the public recipient derived from this identity.
    #[must_use]
    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    /// Returns the X25519 secret key bytes.
    #[must_use]
    pub fn x25519_secret(&self) -> &[u8; X25519_KEY_SIZE] {
        &self.x25519_secret
    }

    /// Returns the packed ML-KEM-768 decapsulation key bytes.
    #[must_use]
    pub fn mlkem_secret(&self) -> &[u8] {
        &self.mlkem_secret
    }

    /// Scans the stanzas for the first hybrid v1 entry and unwraps it.
    ///
    /// # Errors
    ///
    /// Returns [`QageError::NotForMe`] when no stanza matches this
    /// identity's format; callers iterating several identities should treat
    /// that as "skip", not as failure.
    pub fn unwrap(&self, stanzas: &[Stanza]) -> QageResult<Vec<u8>> {
        for stanza in stanzas {
            if stanza.is_hybrid_v1() {
                return self.unwrap_stanza(stanza);
            }
        }
        Err(QageError::NotForMe)
    }

    /// Unwraps a single stanza without scanning.
    ///
    /// # Errors
    ///
    /// Returns [`QageError::StanzaTooShort`] for a truncated body and
    /// [`QageError::InvalidKey`] if the classical exchange rejects the key
    /// material.
    pub fn unwrap_stanza(&self, stanza: &Stanza) -> QageResult<Vec<u8>> {
        match self.suite {
            Suite::HybridX25519MlKem768 => hybrid::unwrap_x25519_mlkem768(
                &self.x25519_secret,
                &self.mlkem_secret,
                &stanza.body,
            ),
        }
    }

    /// Formats this identity as one identity-file line:
    /// `QAGE-SECRET-KEY-1 <encoded> [# comment]`.
    ///
    /// The layout is deterministic; the same identity and comment always
    /// produce the same line.
    #[must_use]
    pub fn to_file_line(&self, comment: Option<&str>) -> String {
        match comment {
            Some(comment) if !comment.is_empty() => {
                format!("{IDENTITY_FILE_MARKER} {self} # {comment}")
            }
            _ => format!("{IDENTITY_FILE_MARKER} {self}"),
        }
    }

    /// Parses one identity-file line, returning the identity and the
    /// optional trailing comment with its leading `#` and whitespace
    /// stripped.
    ///
    /// # Errors
    ///
    /// Blank lines, comment-only lines, and lines without the
    /// `QAGE-SECRET-KEY-1 ` marker are [`QageError::InvalidFileLine`].
    pub fn from_file_line(line: &str) -> QageResult<(Self, Option<String>)> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Err(QageError::InvalidFileLine);
        }

        let rest = line
            .strip_prefix(IDENTITY_FILE_MARKER)
            .and_then(|rest| rest.strip_prefix(' '))
            .ok_or(QageError::InvalidFileLine)?;

        let (key_str, comment) = match rest.split_once(' ') {
            Some((key_str, trailing)) => {
                let comment = trailing.trim().trim_start_matches('#').trim();
                let comment = (!comment.is_empty()).then(|| comment.to_string());
                (key_str, comment)
            }
            None => (rest, None),
        };

        let identity = key_str.parse()?;
        Ok((identity, comment))
    }

    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(1 + X25519_KEY_SIZE + self.mlkem_secret.len());
        payload.push(self.suite.tag());
        payload.extend_from_slice(&self.x25519_secret);
        payload.extend_from_slice(&self.mlkem_secret);
        payload
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut payload = self.payload();
        let result = bech32::encode(IDENTITY_HRP, &payload);
        payload.zeroize();
        f.write_str(&result.map_err(|_| fmt::Error)?)
    }
}

impl Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("suite", &self.suite)
            .field("x25519_secret", &"[REDACTED]")
            .field("mlkem_secret", &"[REDACTED]")
            .finish()
    }
}

impl FromStr for Identity {
    type Err = QageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, mut payload) = bech32::decode(s)?;
        if hrp != IDENTITY_HRP {
            payload.zeroize();
            return Err(QageError::UnexpectedHrp {
                expected: IDENTITY_HRP,
                actual: hrp,
            });
        }

        let result = Self::parse_payload(&payload);
        payload.zeroize();
        result
    }
}

impl Identity {
    fn parse_payload(payload: &[u8]) -> QageResult<Self> {
        let (&tag, rest) = payload.split_first().ok_or(QageError::EmptyPayload)?;
        let suite = Suite::from_tag(tag)?;
        match suite {
            Suite::HybridX25519MlKem768 => {
                let expected = suite.identity_payload_len();
                if rest.len() != expected {
                    return Err(QageError::InvalidLength {
                        kind: "identity",
                        expected,
                        actual: rest.len(),
                    });
                }
                let mut x25519_secret = [0u8; X25519_KEY_SIZE];
                x25519_secret.copy_from_slice(&rest[..X25519_KEY_SIZE]);
                Self::from_parts(suite, x25519_secret, rest[X25519_KEY_SIZE..].to_vec())
            }
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        if self.suite != other.suite || self.mlkem_secret.len() != other.mlkem_secret.len() {
            return false;
        }
        let x_eq = self.x25519_secret.ct_eq(&other.x25519_secret);
        let m_eq = self.mlkem_secret.ct_eq(&other.mlkem_secret);
        (x_eq & m_eq).into()
    }
}

impl Eq for Identity {}

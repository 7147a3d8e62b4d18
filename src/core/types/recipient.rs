//! Public encryption target for one suite.
//!
//! Serialized form: checksummed text under the `qage` prefix, carrying one
//! suite tag byte followed by the X25519 public key and the ML-KEM-768
//! encapsulation key.

use core::fmt::{self, Debug, Display};
use core::str::FromStr;

use crate::core::bech32;
use crate::core::error::{QageError, QageResult};
use crate::core::operations::hybrid;
use crate::core::suite::{Suite, X25519_KEY_SIZE};
use crate::core::types::Stanza;

/// Human-readable prefix of an encoded recipient.
pub const RECIPIENT_HRP: &str = "qage";

/// A qage public recipient for encryption.
///
/// Immutable once constructed; parsing either yields a fully valid
/// recipient or fails.
#[derive(Clone, PartialEq, Eq)]
pub struct Recipient {
    suite: Suite,
    x25519_pub: [u8; X25519_KEY_SIZE],
    mlkem_pub: Vec<u8>,
}

impl Recipient {
    pub(crate) fn new(
        suite: Suite,
        x25519_pub: [u8; X25519_KEY_SIZE],
        mlkem_pub: Vec<u8>,
    ) -> Self {
        Self {
            suite,
            x25519_pub,
            mlkem_pub,
        }
    }

    /// Returns the cryptographic suite of this recipient.
    #[must_use]
    pub fn suite(&self) -> Suite {
        self.suite
    }

    /// Returns the X25519 public key bytes.
    #[must_use]
    pub fn x25519_public(&self) -> &[u8; X25519_KEY_SIZE] {
        &self.x25519_pub
    }

    /// Returns the packed ML-KEM-768 encapsulation key bytes.
    #[must_use]
    pub fn mlkem_public(&self) -> &[u8] {
        &self.mlkem_pub
    }

    /// Wraps a symmetric file key for this recipient.
    ///
    /// Exactly one stanza is returned; each call generates a fresh
    /// ephemeral key, so wrapping the same file key twice yields different
    /// stanza bodies.
    ///
    /// # Errors
    ///
    /// Fails only on malformed recipient key material or an RNG failure.
    pub fn wrap(&self, file_key: &[u8]) -> QageResult<Vec<Stanza>> {
        match self.suite {
            Suite::HybridX25519MlKem768 => {
                let stanza =
                    hybrid::wrap_x25519_mlkem768(&self.x25519_pub, &self.mlkem_pub, file_key)?;
                Ok(vec![stanza])
            }
        }
    }

    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(1 + X25519_KEY_SIZE + self.mlkem_pub.len());
        payload.push(self.suite.tag());
        payload.extend_from_slice(&self.x25519_pub);
        payload.extend_from_slice(&self.mlkem_pub);
        payload
    }

    pub(crate) fn from_payload(payload: &[u8]) -> QageResult<Self> {
        let (&tag, rest) = payload.split_first().ok_or(QageError::EmptyPayload)?;
        let suite = Suite::from_tag(tag)?;
        match suite {
            Suite::HybridX25519MlKem768 => {
                let expected = suite.recipient_payload_len();
                if rest.len() != expected {
                    return Err(QageError::InvalidLength {
                        kind: "recipient",
                        expected,
                        actual: rest.len(),
                    });
                }
                let mut x25519_pub = [0u8; X25519_KEY_SIZE];
                x25519_pub.copy_from_slice(&rest[..X25519_KEY_SIZE]);
                Ok(Self::new(suite, x25519_pub, rest[X25519_KEY_SIZE..].to_vec()))
            }
        }
    }
}

impl Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = bech32::encode(RECIPIENT_HRP, &self.payload()).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

impl Debug for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipient")
            .field("suite", &self.suite)
            .finish_non_exhaustive()
    }
}

impl FromStr for Recipient {
    type Err = QageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hrp, payload) = bech32::decode(s)?;
        if hrp != RECIPIENT_HRP {
            return Err(QageError::UnexpectedHrp {
                expected: RECIPIENT_HRP,
                actual: hrp,
            });
        }
        Self::from_payload(&payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::suite::MLKEM768_PUBLIC_KEY_SIZE;

    fn sample() -> Recipient {
        Recipient::new(
            Suite::HybridX25519MlKem768,
            [0xa1; X25519_KEY_SIZE],
            vec![0xb2; MLKEM768_PUBLIC_KEY_SIZE],
        )
    }

    #[test]
    fn test_roundtrip() -> QageResult<()> {
        let original = sample();
        let encoded = original.to_string();
        assert!(encoded.starts_with("qage1"));

        let parsed: Recipient = encoded.parse()?;
        assert_eq!(parsed.suite(), original.suite());
        assert_eq!(parsed.x25519_public(), original.x25519_public());
        assert_eq!(parsed.mlkem_public(), original.mlkem_public());
        Ok(())
    }

    #[test]
    fn test_rejects_wrong_hrp() {
        let encoded = bech32::encode("qagex", &sample().payload()).expect("encode");
        assert!(matches!(
            encoded.parse::<Recipient>(),
            Err(QageError::UnexpectedHrp { expected: "qage", .. })
        ));
    }

    #[test]
    fn test_rejects_empty_payload() {
        let encoded = bech32::encode(RECIPIENT_HRP, &[]).expect("encode");
        assert!(matches!(
            encoded.parse::<Recipient>(),
            Err(QageError::EmptyPayload)
        ));
    }

    #[test]
    fn test_rejects_unknown_suite() {
        let mut payload = sample().payload();
        payload[0] = 9;
        let encoded = bech32::encode(RECIPIENT_HRP, &payload).expect("encode");
        assert!(matches!(
            encoded.parse::<Recipient>(),
            Err(QageError::UnknownSuite(9))
        ));
    }

    #[test]
    fn test_rejects_truncated_payload() {
        let mut payload = sample().payload();
        payload.truncate(100);
        let encoded = bech32::encode(RECIPIENT_HRP, &payload).expect("encode");
        assert!(matches!(
            encoded.parse::<Recipient>(),
            Err(QageError::InvalidLength {
                kind: "recipient",
                expected: 1216,
                actual: 99,
            })
        ));
    }

    #[test]
    fn test_debug_omits_key_material() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("suite"));
        assert!(!debug.contains("a1"));
    }
}

//! Key generation and public-key derivation for the hybrid suite.
//!
//! All randomness comes from the operating system; there is no deterministic
//! substitute for these paths.

use ml_kem::kem::DecapsulationKey;
use ml_kem::{Encoded, EncodedSizeUser, KemCore, MlKem768, MlKem768Params};
use rand_core::{OsRng, RngCore};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::core::error::{QageError, QageResult};
use crate::core::suite::{MLKEM768_SECRET_KEY_SIZE, X25519_KEY_SIZE};

/// Generates a fresh X25519 keypair, returned as (secret, public).
///
/// # Errors
///
/// Returns [`QageError::Crypto`] if the system RNG fails.
pub(crate) fn generate_x25519() -> QageResult<([u8; X25519_KEY_SIZE], [u8; X25519_KEY_SIZE])> {
    let mut secret = [0u8; X25519_KEY_SIZE];
    OsRng
        .try_fill_bytes(&mut secret)
        .map_err(|_| QageError::Crypto)?;
    let public = x25519_public_key(&secret);
    Ok((secret, public))
}

/// Derives the X25519 public key from a secret key.
pub(crate) fn x25519_public_key(secret: &[u8; X25519_KEY_SIZE]) -> [u8; X25519_KEY_SIZE] {
    let mut secret_copy = *secret;
    let scalar = StaticSecret::from(secret_copy);
    secret_copy.zeroize();
    PublicKey::from(&scalar).to_bytes()
}

/// Generates a fresh ML-KEM-768 keypair, returned as (secret, public) in
/// their packed byte encodings.
pub(crate) fn generate_mlkem768() -> (Vec<u8>, Vec<u8>) {
    let (dk, ek) = MlKem768::generate(&mut OsRng);
    (dk.as_bytes().to_vec(), ek.as_bytes().to_vec())
}

/// Recovers the packed ML-KEM-768 encapsulation key embedded in a packed
/// decapsulation key.
///
/// # Errors
///
/// Returns [`QageError::InvalidLength`] if the secret key is not exactly
/// the packed decapsulation-key size.
pub(crate) fn mlkem768_public_key(secret: &[u8]) -> QageResult<Vec<u8>> {
    let encoded = Encoded::<DecapsulationKey<MlKem768Params>>::try_from(secret).map_err(|_| {
        QageError::InvalidLength {
            kind: "ML-KEM-768 secret key",
            expected: MLKEM768_SECRET_KEY_SIZE,
            actual: secret.len(),
        }
    })?;
    let dk = DecapsulationKey::<MlKem768Params>::from_bytes(&encoded);
    Ok(dk.encapsulation_key().as_bytes().to_vec())
}

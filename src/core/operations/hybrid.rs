//! Hybrid X25519 + ML-KEM-768 wrap and unwrap.
//!
//! Wrapping combines a fresh ephemeral X25519 exchange with an ML-KEM-768
//! encapsulation against the recipient's keys, derives a 32-byte wrap key
//! from both shared secrets, and XOR-encrypts the file key under it. The
//! concatenation order of the shared secrets (classical first, then
//! post-quantum) and the derivation info string are part of the wire
//! contract and must match exactly on both sides.
//!
//! The XOR construction is not authenticated; it is sound only because the
//! ephemeral key never repeats and the wrap key is never reused. Changing it
//! would change the wire format.

use ml_kem::kem::{Decapsulate, DecapsulationKey, Encapsulate, EncapsulationKey};
use ml_kem::{Ciphertext, Encoded, EncodedSizeUser, MlKem768, MlKem768Params};
use rand_core::{OsRng, RngCore};
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::core::error::{QageError, QageResult};
use crate::core::operations::hkdf;
use crate::core::suite::{MLKEM768_CIPHERTEXT_SIZE, WRAP_KEY_SIZE, X25519_KEY_SIZE};
use crate::core::types::Stanza;

/// Domain separation string for wrap-key derivation.
const WRAP_INFO: &[u8] = b"qage/wrap";

/// Wraps a file key for the given hybrid recipient keys, producing the v1
/// stanza body: ephemeral public key ‖ KEM ciphertext ‖ encrypted file key.
///
/// A fresh ephemeral X25519 keypair is generated on every call and never
/// reused.
///
/// # Errors
///
/// Fails only on malformed recipient key material or an RNG failure.
pub(crate) fn wrap_x25519_mlkem768(
    x25519_pub: &[u8; X25519_KEY_SIZE],
    mlkem_pub: &[u8],
    file_key: &[u8],
) -> QageResult<Stanza> {
    // Ephemeral X25519 exchange.
    let mut ephemeral_bytes = [0u8; X25519_KEY_SIZE];
    OsRng
        .try_fill_bytes(&mut ephemeral_bytes)
        .map_err(|_| QageError::Crypto)?;
    let ephemeral_secret = StaticSecret::from(ephemeral_bytes);
    ephemeral_bytes.zeroize();
    let ephemeral_pub = PublicKey::from(&ephemeral_secret);

    let z1 = ephemeral_secret.diffie_hellman(&PublicKey::from(*x25519_pub));
    if !z1.was_contributory() {
        return Err(QageError::InvalidKey);
    }

    // ML-KEM-768 encapsulation against the recipient's public key.
    let encoded =
        Encoded::<EncapsulationKey<MlKem768Params>>::try_from(mlkem_pub).map_err(|_| QageError::InvalidKey)?;
    let ek = EncapsulationKey::<MlKem768Params>::from_bytes(&encoded);
    let (ct, z2) = ek.encapsulate(&mut OsRng).map_err(|_| QageError::Crypto)?;

    let encrypted_key = xor_with_wrap_key(z1.as_bytes(), &z2, file_key)?;

    let mut body =
        Vec::with_capacity(X25519_KEY_SIZE + MLKEM768_CIPHERTEXT_SIZE + encrypted_key.len());
    body.extend_from_slice(ephemeral_pub.as_bytes());
    body.extend_from_slice(&ct);
    body.extend_from_slice(&encrypted_key);

    Ok(Stanza::hybrid_v1(body))
}

/// Unwraps a v1 stanza body with the given hybrid identity keys, recovering
/// the file key.
///
/// The body length check always precedes any cryptographic work.
///
/// # Errors
///
/// Returns [`QageError::StanzaTooShort`] if the body cannot hold the fixed
/// fields, [`QageError::InvalidKey`] if the classical exchange rejects the
/// key material, and [`QageError::InvalidLength`] if the stored ML-KEM
/// secret key is malformed.
pub(crate) fn unwrap_x25519_mlkem768(
    x25519_secret: &[u8; X25519_KEY_SIZE],
    mlkem_secret: &[u8],
    body: &[u8],
) -> QageResult<Vec<u8>> {
    if body.len() < X25519_KEY_SIZE + MLKEM768_CIPHERTEXT_SIZE {
        return Err(QageError::StanzaTooShort);
    }

    let mut ephemeral_pub = [0u8; X25519_KEY_SIZE];
    ephemeral_pub.copy_from_slice(&body[..X25519_KEY_SIZE]);
    let ct_bytes = &body[X25519_KEY_SIZE..X25519_KEY_SIZE + MLKEM768_CIPHERTEXT_SIZE];
    let encrypted_key = &body[X25519_KEY_SIZE + MLKEM768_CIPHERTEXT_SIZE..];

    // Classical exchange against the ephemeral public key.
    let mut secret_copy = *x25519_secret;
    let scalar = StaticSecret::from(secret_copy);
    secret_copy.zeroize();
    let z1 = scalar.diffie_hellman(&PublicKey::from(ephemeral_pub));
    if !z1.was_contributory() {
        return Err(QageError::InvalidKey);
    }

    // ML-KEM-768 decapsulation.
    let encoded = Encoded::<DecapsulationKey<MlKem768Params>>::try_from(mlkem_secret).map_err(
        |_| QageError::InvalidLength {
            kind: "ML-KEM-768 secret key",
            expected: crate::core::suite::MLKEM768_SECRET_KEY_SIZE,
            actual: mlkem_secret.len(),
        },
    )?;
    let dk = DecapsulationKey::<MlKem768Params>::from_bytes(&encoded);
    let ct = Ciphertext::<MlKem768>::try_from(ct_bytes).map_err(|_| QageError::Crypto)?;
    let z2 = dk.decapsulate(&ct).map_err(|_| QageError::Crypto)?;

    xor_with_wrap_key(z1.as_bytes(), &z2, encrypted_key)
}

/// Derives the wrap key from both shared secrets and XOR-encrypts (or
/// decrypts) `data` against it, cycling the wrap key if `data` is longer.
fn xor_with_wrap_key(z1: &[u8; 32], z2: &[u8], data: &[u8]) -> QageResult<Vec<u8>> {
    let mut ikm = Vec::with_capacity(z1.len() + z2.len());
    ikm.extend_from_slice(z1);
    ikm.extend_from_slice(z2);
    let mut wrap_key = hkdf::derive(&[], &ikm, WRAP_INFO, WRAP_KEY_SIZE)?;
    ikm.zeroize();

    let out = data
        .iter()
        .zip(wrap_key.iter().cycle())
        .map(|(byte, key)| byte ^ key)
        .collect();
    wrap_key.zeroize();
    Ok(out)
}

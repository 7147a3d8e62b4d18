//! HMAC-SHA-256 extract-and-expand key derivation.
//!
//! This is the standard two-stage construction: `extract` condenses input
//! keying material into a pseudorandom key under a salt, and `expand`
//! stretches that key into any requested amount of output, feeding each
//! block's predecessor, the info string, and a 1-based counter byte back
//! through the keyed hash. `derive` composes the two.
//!
//! Determinism is a hard contract here: identical inputs must always yield
//! identical output bytes, because both ends of a wrap/unwrap pair rederive
//! the same wrap key independently.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::core::error::{QageError, QageResult};

type HmacSha256 = Hmac<Sha256>;

/// Size of one HMAC-SHA-256 output block in bytes.
const BLOCK_SIZE: usize = 32;

/// Extracts a pseudorandom key from input keying material.
///
/// An empty salt is treated as a zero-length HMAC key.
///
/// # Errors
///
/// Returns [`QageError::Crypto`] if the MAC cannot be keyed.
pub fn extract(salt: &[u8], ikm: &[u8]) -> QageResult<[u8; BLOCK_SIZE]> {
    let mut mac = HmacSha256::new_from_slice(salt).map_err(|_| QageError::Crypto)?;
    mac.update(ikm);
    Ok(mac.finalize().into_bytes().into())
}

/// Expands a pseudorandom key into `length` bytes of output keying material.
///
/// Requesting zero bytes yields an empty vector.
///
/// # Errors
///
/// Returns [`QageError::Crypto`] if the MAC cannot be keyed.
pub fn expand(prk: &[u8], info: &[u8], length: usize) -> QageResult<Vec<u8>> {
    let mut out = Vec::with_capacity(length);
    let mut block: Vec<u8> = Vec::new();
    let mut counter: u8 = 1;
    while out.len() < length {
        let mut mac = HmacSha256::new_from_slice(prk).map_err(|_| QageError::Crypto)?;
        mac.update(&block);
        mac.update(info);
        mac.update(&[counter]);
        block = mac.finalize().into_bytes().to_vec();
        let need = (length - out.len()).min(block.len());
        out.extend_from_slice(&block[..need]);
        counter = counter.wrapping_add(1);
    }
    Ok(out)
}

/// Extracts then expands in one call.
///
/// # Errors
///
/// Returns [`QageError::Crypto`] if the MAC cannot be keyed.
pub fn derive(salt: &[u8], ikm: &[u8], info: &[u8], length: usize) -> QageResult<Vec<u8>> {
    let prk = extract(salt, ikm)?;
    expand(&prk, info, length)
}

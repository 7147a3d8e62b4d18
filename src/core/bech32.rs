//! Checksummed text encoding for qage keys.
//!
//! This is the classic BCH-checksummed, base-32 string format (BIP-0173
//! lineage) with one deviation from the Bitcoin profile: the overall string
//! length is capped at 6000 characters instead of 90, because a hybrid
//! post-quantum key payload is far larger than an address.
//!
//! Strings look like `{hrp}1{data}{checksum}` where the human-readable part
//! identifies the key kind, `1` is the separator, and the trailing six
//! symbols are the checksum. Only lowercase strings are accepted.

use thiserror::Error;

/// The 32-character data alphabet.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Generator coefficients for the BCH checksum accumulator.
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

/// Number of trailing checksum symbols.
const CHECKSUM_LEN: usize = 6;

/// Minimum length of an encoded string: 1 HRP char + separator + checksum.
const MIN_ENCODED_LEN: usize = 8;

/// Maximum length of an encoded string.
const MAX_ENCODED_LEN: usize = 6000;

/// Errors produced by the checksummed codec.
///
/// Every variant is fatal to the parse; there is no partial decode.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Bech32Error {
    /// The human-readable part is empty, too long, or contains a character
    /// outside the printable lowercase range.
    #[error("invalid human-readable part")]
    InvalidHrp,

    /// The encoded string is shorter than 8 or longer than 6000 characters.
    #[error("invalid encoded length")]
    InvalidLength,

    /// The encoded string contains uppercase or non-printable characters.
    #[error("mixed case or invalid character")]
    InvalidCase,

    /// No `1` separator, or it leaves no HRP or a truncated checksum.
    #[error("invalid separator position")]
    InvalidSeparator,

    /// A data character is not part of the 32-character alphabet.
    #[error("invalid data character")]
    InvalidCharset,

    /// The checksum does not verify.
    #[error("checksum mismatch")]
    BadChecksum,

    /// A 5-bit symbol carried a value outside its bit width.
    #[error("invalid data range")]
    InvalidDataRange,

    /// The residual bits after regrouping were non-zero, indicating a
    /// truncated or corrupted payload.
    #[error("invalid padding")]
    InvalidPadding,
}

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let b = chk >> 25;
        chk = (chk & 0x01ff_ffff) << 5 ^ u32::from(v);
        for (i, gen) in GENERATOR.iter().enumerate() {
            if (b >> i) & 1 != 0 {
                chk ^= gen;
            }
        }
    }
    chk
}

/// Expands the HRP for checksumming: high bits of each byte, a zero
/// separator, then the low bits of each byte.
fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 31));
    out
}

fn create_checksum(hrp: &str, data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let values = hrp_expand(hrp)
        .into_iter()
        .chain(data.iter().copied())
        .chain([0u8; CHECKSUM_LEN]);
    let pm = polymod(values) ^ 1;
    let mut checksum = [0u8; CHECKSUM_LEN];
    for (i, c) in checksum.iter_mut().enumerate() {
        *c = ((pm >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

fn verify_checksum(hrp: &str, data: &[u8]) -> bool {
    polymod(hrp_expand(hrp).into_iter().chain(data.iter().copied())) == 1
}

fn valid_hrp_char(c: u8) -> bool {
    (33..=126).contains(&c) && !c.is_ascii_uppercase()
}

/// Regroups bits from `from`-bit symbols into `to`-bit symbols.
///
/// With `pad` set, leftover bits are flushed as a final zero-padded symbol
/// (encoding). Without it, leftover bits must be shorter than an input
/// symbol and all zero (decoding), otherwise the input was truncated or the
/// encoder misbehaved.
pub(crate) fn convert_bits(
    data: &[u8],
    from: u32,
    to: u32,
    pad: bool,
) -> Result<Vec<u8>, Bech32Error> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let maxv: u32 = (1 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        if u32::from(value) >> from != 0 {
            return Err(Bech32Error::InvalidDataRange);
        }
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & maxv) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
        return Err(Bech32Error::InvalidPadding);
    }
    Ok(out)
}

/// Encodes raw 8-bit data under the given human-readable part.
///
/// # Errors
///
/// Returns [`Bech32Error::InvalidHrp`] if the HRP is empty, longer than 83
/// characters, or contains characters outside 33..=126 or any uppercase.
pub fn encode(hrp: &str, raw: &[u8]) -> Result<String, Bech32Error> {
    if hrp.is_empty() || hrp.len() > 83 {
        return Err(Bech32Error::InvalidHrp);
    }
    if !hrp.bytes().all(valid_hrp_char) {
        return Err(Bech32Error::InvalidHrp);
    }

    let data = convert_bits(raw, 8, 5, true)?;
    let checksum = create_checksum(hrp, &data);

    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for symbol in data.iter().chain(checksum.iter()) {
        out.push(char::from(CHARSET[*symbol as usize]));
    }
    Ok(out)
}

/// Decodes an encoded string into its human-readable part and raw 8-bit data.
///
/// # Errors
///
/// Fails on out-of-range length, uppercase or non-printable characters, a
/// misplaced separator, characters outside the alphabet, a checksum
/// mismatch, or non-zero residual padding bits.
pub fn decode(s: &str) -> Result<(String, Vec<u8>), Bech32Error> {
    if s.len() < MIN_ENCODED_LEN || s.len() > MAX_ENCODED_LEN {
        return Err(Bech32Error::InvalidLength);
    }
    if !s.bytes().all(valid_hrp_char) {
        return Err(Bech32Error::InvalidCase);
    }

    let pos = s.rfind('1').ok_or(Bech32Error::InvalidSeparator)?;
    if pos < 1 || pos + 1 + CHECKSUM_LEN > s.len() {
        return Err(Bech32Error::InvalidSeparator);
    }
    let hrp = &s[..pos];
    let data_part = &s[pos + 1..];

    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.bytes() {
        let symbol = CHARSET
            .iter()
            .position(|&x| x == c)
            .ok_or(Bech32Error::InvalidCharset)?;
        data.push(symbol as u8);
    }

    if !verify_checksum(hrp, &data) {
        return Err(Bech32Error::BadChecksum);
    }

    let payload = &data[..data.len() - CHECKSUM_LEN];
    let raw = convert_bits(payload, 5, 8, false)?;
    Ok((hrp.to_string(), raw))
}

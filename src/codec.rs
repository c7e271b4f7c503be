// Radix-128 message codec
// Byte <-> BigNum mapping and length-prefixed block chunking driving
// mod_pow for encrypt/decrypt/sign/verify

use thiserror::Error;

use crate::bignum::BigNum;
use crate::error::Error as NumError;
use crate::modular::mod_pow;

/// Fixed radix of the byte encoding; input bytes must stay below it so
/// the integer round-trip is exact.
pub const BYTE_RADIX: u64 = 128;

/// Errors from the chunking codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input byte does not fit the radix-128 encoding.
    #[error("byte value {0:#04x} outside radix-128 range")]
    ByteOutOfRange(u8),

    /// Key too short to fit a length prefix plus payload in one block.
    #[error("key size too small for block framing")]
    KeyTooSmall,

    /// A block's integer value must stay below the modulus.
    #[error("block value exceeds the modulus")]
    BlockTooLarge,

    /// Recovered block carries an impossible payload length.
    #[error("invalid block length prefix {0}")]
    InvalidBlockLength(u8),

    #[error(transparent)]
    Num(#[from] NumError),
}

/// Fold bytes (big-endian, most significant first) into an integer.
pub fn bytes_to_bignum(bytes: &[u8]) -> Result<BigNum, CodecError> {
    let radix = BigNum::from(BYTE_RADIX);
    let mut value = BigNum::zero();
    for &b in bytes {
        if b as u64 >= BYTE_RADIX {
            return Err(CodecError::ByteOutOfRange(b));
        }
        value = &(&value * &radix) + &BigNum::from(b as u64);
    }
    Ok(value)
}

/// Unfold an integer back into big-endian radix-128 bytes. Leading zero
/// bytes are not represented; zero maps to no bytes at all.
pub fn bignum_to_bytes(value: &BigNum) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut v = value.abs();
    while !v.is_zero() {
        let (q, r) = v.div_rem_u64(BYTE_RADIX);
        bytes.push(r as u8);
        v = q;
    }
    bytes.reverse();
    bytes
}

/// Encrypt a message under the public key, one block per `key_bits/8`
/// bytes with a one-byte payload-length prefix.
pub fn encrypt_chunks(
    message: &[u8],
    e: &BigNum,
    n: &BigNum,
    key_bits: u32,
) -> Result<Vec<BigNum>, CodecError> {
    transform_chunks(message, e, n, key_bits)
}

/// Recover a message from encrypted blocks with the private exponent.
pub fn decrypt_chunks(chunks: &[BigNum], d: &BigNum, n: &BigNum) -> Result<Vec<u8>, CodecError> {
    recover_chunks(chunks, d, n)
}

/// Sign a message: same chunk framing as encryption, exponentiated with
/// the private key.
pub fn sign_chunks(
    message: &[u8],
    d: &BigNum,
    n: &BigNum,
    key_bits: u32,
) -> Result<Vec<BigNum>, CodecError> {
    transform_chunks(message, d, n, key_bits)
}

/// Verify a signature by recovering the signed bytes with the public
/// exponent and comparing against the message.
pub fn verify_chunks(
    message: &[u8],
    signature: &[BigNum],
    e: &BigNum,
    n: &BigNum,
) -> Result<bool, CodecError> {
    let recovered = recover_chunks(signature, e, n)?;
    Ok(recovered == message)
}

fn transform_chunks(
    message: &[u8],
    exponent: &BigNum,
    n: &BigNum,
    key_bits: u32,
) -> Result<Vec<BigNum>, CodecError> {
    let k = (key_bits / 8) as usize;
    if k < 2 {
        return Err(CodecError::KeyTooSmall);
    }
    let payload = k - 1;

    let mut blocks = Vec::new();
    for chunk in message.chunks(payload) {
        let mut block = Vec::with_capacity(k);
        block.push(chunk.len() as u8);
        block.extend_from_slice(chunk);
        // the last partial block is zero-filled up to the block size
        block.resize(k, 0);

        let m = bytes_to_bignum(&block)?;
        if m >= *n {
            return Err(CodecError::BlockTooLarge);
        }
        blocks.push(mod_pow(&m, exponent, n)?);
    }
    Ok(blocks)
}

fn recover_chunks(
    blocks: &[BigNum],
    exponent: &BigNum,
    n: &BigNum,
) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    let mut k = 0usize;
    for block in blocks {
        let m = mod_pow(block, exponent, n)?;
        let bytes = bignum_to_bytes(&m);
        // a well-formed block always decrypts with its non-zero length
        // prefix in the top radix position; zero means corruption
        if bytes.is_empty() {
            return Err(CodecError::InvalidBlockLength(0));
        }
        // the block size is fixed per key; the first block sets it
        if k == 0 {
            k = bytes.len();
        }
        let len = bytes[0] as usize;
        if len > k - 1 || len >= bytes.len() {
            return Err(CodecError::InvalidBlockLength(bytes[0]));
        }
        out.extend_from_slice(&bytes[1..=len]);
    }
    Ok(out)
}

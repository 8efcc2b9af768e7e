// ## 📂 File: `src/container/encode.rs`
//! src/container/encode.rs
//!
//! Reference encoder: the exact inverse of `decode_container`.
//!
//! Design notes:
//! - Frame layout must match `types.rs` parsing exactly.
//! - `build_frame` and `seal_frame` are split so callers can craft frames
//!   (fixtures, tamper tests) before encryption.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::constants::{FRAME_DIGEST_LEN, FRAME_SIGNATURE, IV_LEN, MIN_FRAME_LEN, SALT_LEN};
use crate::crypto::{cbc_encrypt, derive_container_key, sha256, CryptoError};

/// Serialize `payload` into a plaintext frame:
/// `[ len:i64 LE ][ signature ][ payload ][ sha256(payload) ]`.
pub fn build_frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(MIN_FRAME_LEN + payload.len());
    out.extend_from_slice(&(payload.len() as i64).to_le_bytes());
    out.extend_from_slice(&FRAME_SIGNATURE);
    out.extend_from_slice(payload);
    out.extend_from_slice(&sha256(payload));
    debug_assert_eq!(out.len(), MIN_FRAME_LEN + payload.len());
    debug_assert_eq!(&out[out.len() - FRAME_DIGEST_LEN..], &sha256(payload)[..]);
    out
}

/// Encrypt an arbitrary plaintext frame into container bytes.
pub fn seal_frame(
    frame: &[u8],
    iv: &[u8; IV_LEN],
    salt: &[u8; SALT_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let key = derive_container_key(salt);
    let ciphertext = cbc_encrypt(&key, iv, frame)?;

    let mut out = Vec::with_capacity(IV_LEN + SALT_LEN + ciphertext.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(salt);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Encode `payload` with a caller-chosen IV and salt.
pub fn encode_container(
    payload: &[u8],
    iv: &[u8; IV_LEN],
    salt: &[u8; SALT_LEN],
) -> Result<Vec<u8>, CryptoError> {
    seal_frame(&build_frame(payload), iv, salt)
}

/// Encode `payload` with a fresh random IV and salt from the OS RNG.
pub fn encode_container_random(payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let mut iv = [0u8; IV_LEN];
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut iv);
    OsRng.fill_bytes(&mut salt);
    encode_container(payload, &iv, &salt)
}

//! crypto/digest.rs
//! SHA-256 payload digest carried in the decrypted frame.

use sha2::{Digest, Sha256};

use crate::constants::FRAME_DIGEST_LEN;

/// SHA-256 of `data`.
#[inline]
pub fn sha256(data: &[u8]) -> [u8; FRAME_DIGEST_LEN] {
    let mut out = [0u8; FRAME_DIGEST_LEN];
    out.copy_from_slice(&Sha256::digest(data));
    out
}

/// Recompute the digest of `payload` and compare it with `expected`.
#[inline]
pub fn verify_sha256(payload: &[u8], expected: &[u8]) -> bool {
    expected.len() == FRAME_DIGEST_LEN && sha256(payload).as_slice() == expected
}

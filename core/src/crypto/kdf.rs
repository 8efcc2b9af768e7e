// ## src/crypto/kdf.rs

//! crypto/kdf.rs
//! Iterated-hash key derivation used by the scatter container.
//!
//! Design:
//! - round 1: SHA-256(passphrase || salt)
//! - rounds 2..=N: SHA-256(previous digest)
//! - the final 32-byte digest is the AES-256 key
//!
//! This is the vendor's scheme (PBKDF1 shape with SHA-256). It is weak on
//! purpose and must stay bit-exact.

use sha2::{Digest, Sha256};

use crate::constants::{KDF_ITERATIONS, KDF_PASSPHRASE, KEY_LEN_32, SALT_LEN};

/// Derive a 32-byte key from `passphrase` and `salt` with `iterations` SHA-256 rounds.
///
/// `iterations` counts the first hash, so `1` means a single SHA-256 over
/// `passphrase || salt`. A value of `0` is treated as `1`.
#[inline]
pub fn derive_key_32(passphrase: &[u8], salt: &[u8], iterations: usize) -> [u8; KEY_LEN_32] {
    let mut hasher = Sha256::new();
    hasher.update(passphrase);
    hasher.update(salt);
    let mut digest = hasher.finalize();

    for _ in 1..iterations.max(1) {
        digest = Sha256::digest(digest);
    }

    let mut key = [0u8; KEY_LEN_32];
    key.copy_from_slice(&digest);
    key
}

/// Derive the container key for a 16-byte salt using the fixed vendor passphrase.
#[inline]
pub fn derive_container_key(salt: &[u8; SALT_LEN]) -> [u8; KEY_LEN_32] {
    derive_key_32(KDF_PASSPHRASE, salt, KDF_ITERATIONS)
}

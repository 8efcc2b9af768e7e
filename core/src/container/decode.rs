// ## 📂 File: `src/container/decode.rs`
//! src/container/decode.rs
//!
//! Container decoding.
//!
//! Design notes:
//! - Length is checked before any key derivation or cipher work.
//! - Signature is checked before the declared length is trusted.
//! - The payload is returned byte-for-byte; it is the XML manifest.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::container::types::{ContainerParts, DecryptedFrame, FormatError};
use crate::crypto::{cbc_decrypt, derive_container_key};
use crate::types::ScatterError;

/// Decrypt and verify a scatter container, returning the manifest bytes.
///
/// # Errors
/// - `Truncated` if the container is under 64 bytes, the frame under 48 bytes,
///   or the declared payload length is negative or runs past the frame.
/// - `DecryptFailed` on misaligned ciphertext or bad padding.
/// - `BadSignature` if the frame magic does not match.
/// - `IntegrityFailed` if the payload digest does not match.
pub fn decode_container(bytes: &[u8]) -> Result<Vec<u8>, FormatError> {
    let parts = ContainerParts::split(bytes)?;
    let key = derive_container_key(parts.salt);

    let plain = cbc_decrypt(&key, parts.iv, parts.ciphertext)?;
    let frame = DecryptedFrame::parse(&plain)?;
    frame.verify()?;

    debug!(
        container_len = bytes.len(),
        payload_len = frame.payload.len(),
        "container decoded"
    );
    Ok(frame.payload.to_vec())
}

/// Read a container from disk and decode it.
pub fn decode_container_file(path: &Path) -> Result<Vec<u8>, ScatterError> {
    let bytes = fs::read(path)?;
    Ok(decode_container(&bytes)?)
}

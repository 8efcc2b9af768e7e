// ## 📂 File: `src/container/types.rs`

//! container/types.rs
//! Borrowed views over the container and the decrypted frame, plus `FormatError`.

use byteorder::{ByteOrder, LittleEndian};
use thiserror::Error;

use crate::constants::{
    FRAME_DIGEST_LEN, FRAME_LEN_FIELD, FRAME_SIGNATURE, FRAME_SIG_FIELD, IV_LEN,
    MIN_CONTAINER_LEN, MIN_FRAME_LEN, SALT_LEN,
};
use crate::crypto::{verify_sha256, CryptoError};

/// Structural failures while decoding a container.
///
/// Every variant is fatal for the current run: the asset is corrupt or tampered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// A section is shorter than its layout (or its declared length) requires.
    /// `declared` is signed because the frame length field is an `i64`.
    #[error("truncated {section}: {have} bytes available, {declared} declared")]
    Truncated {
        section: &'static str,
        have: usize,
        declared: i64,
    },

    /// Cipher layer rejected the ciphertext (alignment or padding).
    #[error("decryption failed: {0}")]
    DecryptFailed(#[from] CryptoError),

    /// The 8 bytes after the length field are not the vendor magic.
    #[error("bad frame signature: {found}")]
    BadSignature { found: String },

    /// SHA-256 of the payload differs from the stored digest.
    #[error("payload digest mismatch")]
    IntegrityFailed,
}

impl FormatError {
    /// Stable short name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            FormatError::Truncated { .. } => "truncated",
            FormatError::DecryptFailed(_) => "decrypt_failed",
            FormatError::BadSignature { .. } => "bad_signature",
            FormatError::IntegrityFailed => "integrity_failed",
        }
    }
}

/// The three regions of an encrypted container.
#[derive(Debug, Clone, Copy)]
pub struct ContainerParts<'a> {
    pub iv: &'a [u8; IV_LEN],
    pub salt: &'a [u8; SALT_LEN],
    pub ciphertext: &'a [u8],
}

impl<'a> ContainerParts<'a> {
    /// Split raw container bytes. Rejects anything shorter than `MIN_CONTAINER_LEN`.
    pub fn split(bytes: &'a [u8]) -> Result<Self, FormatError> {
        let (iv, salt, ciphertext) = Some(bytes)
            .filter(|b| b.len() >= MIN_CONTAINER_LEN)
            .and_then(|b| b.split_first_chunk::<IV_LEN>())
            .and_then(|(iv, rest)| {
                rest.split_first_chunk::<SALT_LEN>()
                    .map(|(salt, ciphertext)| (iv, salt, ciphertext))
            })
            .ok_or(FormatError::Truncated {
                section: "container",
                have: bytes.len(),
                declared: MIN_CONTAINER_LEN as i64,
            })?;

        Ok(Self { iv, salt, ciphertext })
    }
}

/// Parsed view of the decrypted frame.
#[derive(Debug, Clone, Copy)]
pub struct DecryptedFrame<'a> {
    pub declared_len: i64,
    pub payload: &'a [u8],
    pub digest: &'a [u8],
}

impl<'a> DecryptedFrame<'a> {
    /// Parse the frame header and slice payload/digest.
    ///
    /// Order of checks: minimum length, signature, declared length bounds.
    /// Bytes after the digest are ignored.
    pub fn parse(buf: &'a [u8]) -> Result<Self, FormatError> {
        if buf.len() < MIN_FRAME_LEN {
            return Err(FormatError::Truncated {
                section: "frame",
                have: buf.len(),
                declared: MIN_FRAME_LEN as i64,
            });
        }

        let declared_len = LittleEndian::read_i64(&buf[..FRAME_LEN_FIELD]);

        let signature = &buf[FRAME_LEN_FIELD..FRAME_LEN_FIELD + FRAME_SIG_FIELD];
        if signature != FRAME_SIGNATURE {
            return Err(FormatError::BadSignature {
                found: hex::encode(signature),
            });
        }

        let body = &buf[FRAME_LEN_FIELD + FRAME_SIG_FIELD..];
        let size = usize::try_from(declared_len)
            .ok()
            .filter(|size| size.checked_add(FRAME_DIGEST_LEN).is_some_and(|end| end <= body.len()))
            .ok_or(FormatError::Truncated {
                section: "payload",
                have: body.len().saturating_sub(FRAME_DIGEST_LEN),
                declared: declared_len,
            })?;

        let (payload, rest) = body.split_at(size);
        Ok(Self {
            declared_len,
            payload,
            digest: &rest[..FRAME_DIGEST_LEN],
        })
    }

    /// Check the stored digest against the payload.
    pub fn verify(&self) -> Result<(), FormatError> {
        if verify_sha256(self.payload, self.digest) {
            Ok(())
        } else {
            Err(FormatError::IntegrityFailed)
        }
    }
}

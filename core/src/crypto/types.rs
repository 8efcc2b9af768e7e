// ## 📂 File: `src/crypto/types.rs`

use thiserror::Error;

/// Errors raised by the block-cipher layer.
///
/// The container decoder folds all of these into `FormatError::DecryptFailed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Key or IV slice does not match the cipher's fixed sizes.
    #[error("invalid {what} length: expected={expected}, actual={actual}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Ciphertext is empty or not a whole number of cipher blocks.
    #[error("ciphertext length {len} is not a non-zero multiple of {block}")]
    NotBlockAligned { len: usize, block: usize },

    /// PKCS#7 trailer did not verify after decryption.
    #[error("invalid PKCS#7 padding")]
    BadPadding,
}

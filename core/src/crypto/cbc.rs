// ## 📂 File: `src/crypto/cbc.rs`

//! src/crypto/cbc.rs
//! AES-256 in CBC mode with PKCS#7 padding.
//!
//! Design notes:
//! - Key is 32 bytes, IV is one block (16 bytes).
//! - Decryption fails closed: misaligned input or a bad padding trailer
//!   never yields plaintext.

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::constants::{AES_BLOCK_LEN, IV_LEN, KEY_LEN_32};
use crate::crypto::types::CryptoError;

type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;

/// Decrypt `ciphertext` and strip its PKCS#7 padding.
pub fn cbc_decrypt(key: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_len("key", key.len(), KEY_LEN_32)?;
    check_len("iv", iv.len(), IV_LEN)?;

    if ciphertext.is_empty() || ciphertext.len() % AES_BLOCK_LEN != 0 {
        return Err(CryptoError::NotBlockAligned {
            len: ciphertext.len(),
            block: AES_BLOCK_LEN,
        });
    }

    let dec = Aes256CbcDec::new_from_slices(key, iv).map_err(|_| CryptoError::InvalidLength {
        what: "key/iv",
        expected: KEY_LEN_32 + IV_LEN,
        actual: key.len() + iv.len(),
    })?;

    dec.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| CryptoError::BadPadding)
}

/// Encrypt `plaintext` with PKCS#7 padding. Output length is always a
/// non-zero multiple of the block size.
pub fn cbc_encrypt(key: &[u8], iv: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_len("key", key.len(), KEY_LEN_32)?;
    check_len("iv", iv.len(), IV_LEN)?;

    let enc = Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| CryptoError::InvalidLength {
        what: "key/iv",
        expected: KEY_LEN_32 + IV_LEN,
        actual: key.len() + iv.len(),
    })?;

    Ok(enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

#[inline]
fn check_len(what: &'static str, actual: usize, expected: usize) -> Result<(), CryptoError> {
    if actual != expected {
        return Err(CryptoError::InvalidLength { what, expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x11; 32];
    const IV: [u8; 16] = [0x22; 16];

    #[test]
    fn encrypt_then_decrypt() {
        let ct = cbc_encrypt(&KEY, &IV, b"partition table").unwrap();
        assert_eq!(ct.len(), 16);
        assert_eq!(cbc_decrypt(&KEY, &IV, &ct).unwrap(), b"partition table");
    }

    #[test]
    fn full_block_input_gets_an_extra_padding_block() {
        let ct = cbc_encrypt(&KEY, &IV, &[0u8; 32]).unwrap();
        assert_eq!(ct.len(), 48);
    }

    #[test]
    fn misaligned_ciphertext_is_rejected() {
        let err = cbc_decrypt(&KEY, &IV, &[0u8; 17]).unwrap_err();
        assert_eq!(err, CryptoError::NotBlockAligned { len: 17, block: 16 });
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        let err = cbc_decrypt(&KEY[..16], &IV, &[0u8; 16]).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidLength { what: "key", .. }));
    }
}

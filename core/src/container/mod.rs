// ## src/container/mod.rs

//! container/mod.rs
//! Codec for the encrypted scatter container (`*_Android_scatter.x`).
//!
//! Wire layout (all offsets in bytes):
//!
//! ```text
//! container : [ iv:16 ][ salt:16 ][ AES-256-CBC ciphertext, PKCS#7 ]
//! frame     : [ size:i64 LE ][ signature:8 ][ payload:size ][ sha256(payload):32 ]
//! ```
//!
//! The key is derived from the fixed passphrase and the salt (see `crypto::kdf`).
//! Decoding is pure: same bytes in, same payload (or same error) out.

pub mod types;
pub mod decode;
pub mod encode;

pub use types::*;
pub use decode::*;
pub use encode::*;

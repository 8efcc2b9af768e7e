//! crypto/mod.rs
//! Primitives behind the scatter container: key derivation, AES-256-CBC and SHA-256.

pub mod types;
pub mod kdf;
pub mod cbc;
pub mod digest;

pub use types::*;
pub use kdf::*;
pub use cbc::*;
pub use digest::*;

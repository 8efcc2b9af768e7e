//! manifest/mod.rs
//! Scatter manifest (the decrypted XML partition layout).
//!
//! - `tree`: owned node arena with indexed children.
//! - `parse` / `serialize`: lossless XML round trip over `quick-xml` events.
//! - `patch`: idempotent field upserts on partition records.

pub mod types;
pub mod tree;
pub mod parse;
pub mod serialize;
pub mod patch;

pub use types::*;
pub use tree::*;
pub use patch::*;

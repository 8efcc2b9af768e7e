//! pipeline/mod.rs
//! Variant pipeline: encrypted container in, flashing-tool-ready manifest out.
//!
//! Stages:
//! 1. resolve the container for a platform (`resolve`)
//! 2. decode it (`container`)
//! 3. write the plaintext copy, 4. duplicate it for dual-slot use
//! 5. apply patch passes and write the final manifest (`variants`)
//! 6. remove the temporaries (`cleanup`)

pub mod resolve;
pub mod variants;
pub mod cleanup;

pub use resolve::*;
pub use variants::*;
pub use cleanup::*;

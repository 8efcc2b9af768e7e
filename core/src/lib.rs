//! scatter-core
//!
//! Decrypts vendor scatter containers and derives flashing-tool manifests.
//! No process spawning, no device I/O.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;
pub mod config;

// Codec and model
pub mod crypto;
pub mod container;
pub mod manifest;
pub mod telemetry;

// Orchestration
pub mod pipeline;
pub mod device;
pub mod flash;
pub mod flow;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::config::WorkspaceLayout;
    pub use crate::container::{decode_container, encode_container, FormatError};
    pub use crate::device::PropertySource;
    pub use crate::flow::{prepare_flow, FlowOutcome, PlatformSource};
    pub use crate::manifest::{Manifest, PatchOutcome, PatchPass, DATA_PRESERVING, PROVISIONING_ENABLE};
    pub use crate::pipeline::{produce_variants, FlashStrategy, VariantReport};
    pub use crate::types::ScatterError;
}

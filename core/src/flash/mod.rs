//! flash/mod.rs
//! Hand-off to the external flashing tool.
//!
//! The tool is started elsewhere. This module resolves the files it needs
//! (flash manifest, authentication bundle), checks the flash manifest targets
//! the detected platform, swaps in the PRC bootloader images, and rewrites
//! the tool's history file so it opens on those files.

pub mod bundle;
pub mod history;
pub mod prc;

pub use bundle::*;
pub use history::*;
pub use prc::*;

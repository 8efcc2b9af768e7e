// ## 📂 File: `src/pipeline/variants.rs`

//! pipeline/variants.rs
//! Produce the flashing-tool manifest for one platform and strategy.
//!
//! Design notes:
//! - Files are written with `write_replace`; the encrypted source is only read.
//! - Format and I/O errors abort the run. A missing container or a missing
//!   target partition does not.
//! - Temporaries are removed after the final manifest is on disk, and again
//!   (by the sweep) before the next flow.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::config::WorkspaceLayout;
use crate::constants::names;
use crate::container::decode_container;
use crate::manifest::{Manifest, PatchOutcome, DATA_PRESERVING, PROVISIONING_ENABLE};
use crate::pipeline::cleanup::cleanup_temporaries;
use crate::pipeline::resolve::{final_name_for, resolve_container};
use crate::telemetry::{PipelineCounters, PipelineSnapshot, PipelineTimer, Stage};
use crate::types::ScatterError;
use crate::utils::{file_name_of, write_replace};

/// Which manifest variant the flow needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashStrategy {
    /// Full reprovision: provisioning pass only.
    Full,
    /// Upgrade that keeps user data: provisioning pass, then data-preserving pass.
    DataPreserving,
}

impl fmt::Display for FlashStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlashStrategy::Full => "full",
            FlashStrategy::DataPreserving => "data-preserving",
        })
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct VariantReport {
    pub platform: String,
    pub strategy: FlashStrategy,
    pub container: PathBuf,
    pub final_manifest: PathBuf,
    pub provisioning: PatchOutcome,
    pub data_preserving: Option<PatchOutcome>,
    pub telemetry: PipelineSnapshot,
}

/// Paths of the two transient files for an image directory.
pub fn temp_paths(image_dir: &Path) -> (PathBuf, PathBuf) {
    (
        image_dir.join(names::PLAINTEXT_TEMP),
        image_dir.join(names::DUAL_SLOT_TEMP),
    )
}

/// Decode the platform's container and write its patched manifest.
///
/// Returns `Ok(None)` when no container exists for the platform.
pub fn produce_variants(
    layout: &WorkspaceLayout,
    platform: &str,
    strategy: FlashStrategy,
) -> Result<Option<VariantReport>, ScatterError> {
    let mut timer = PipelineTimer::new();
    let mut counters = PipelineCounters::default();
    let image_dir = &layout.image_dir;

    let container = match timer.time(Stage::Resolve, || resolve_container(image_dir, platform))? {
        Some(p) => p,
        None => return Ok(None),
    };
    info!(platform, %strategy, container = %file_name_of(&container), "producing manifest variants");

    // Decode
    let plaintext = timer.time(Stage::Decode, || -> Result<Vec<u8>, ScatterError> {
        let bytes = fs::read(&container).map_err(ScatterError::at(&container))?;
        let plaintext = decode_container(&bytes).map_err(|e| {
            error!(container = %container.display(), kind = e.kind(), error = %e, "container rejected");
            e
        })?;
        counters.add_decode(bytes.len(), plaintext.len());
        Ok(plaintext)
    })?;

    // Plaintext copy, then the dual-slot duplicate read back from it.
    let (plain_path, dual_path) = temp_paths(image_dir);
    let dual_bytes = timer.time(Stage::Write, || -> Result<Vec<u8>, ScatterError> {
        write_replace(&plain_path, &plaintext)?;
        counters.add_write(plaintext.len());
        let copy = fs::read(&plain_path).map_err(ScatterError::at(&plain_path))?;
        write_replace(&dual_path, &copy)?;
        counters.add_write(copy.len());
        Ok(copy)
    })?;
    info!(plaintext = %file_name_of(&plain_path), dual_slot = %file_name_of(&dual_path), "intermediate manifests written");

    let mut manifest = timer.time(Stage::Parse, || Manifest::parse(&dual_bytes))?;

    let (provisioning, data_preserving) = timer.time(
        Stage::Patch,
        || -> Result<(PatchOutcome, Option<PatchOutcome>), ScatterError> {
            let provisioning = PROVISIONING_ENABLE.apply(&mut manifest)?;
            counters.add_patch(&provisioning);
            let data_preserving = match strategy {
                FlashStrategy::Full => None,
                FlashStrategy::DataPreserving => {
                    let outcome = DATA_PRESERVING.apply(&mut manifest)?;
                    counters.add_patch(&outcome);
                    Some(outcome)
                }
            };
            Ok((provisioning, data_preserving))
        },
    )?;

    let final_manifest = image_dir.join(final_name_for(&container));
    timer.time(Stage::Write, || -> Result<(), ScatterError> {
        let out = manifest.serialize();
        write_replace(&final_manifest, &out)?;
        counters.add_write(out.len());
        Ok(())
    })?;

    let cleanup = timer.time(Stage::Cleanup, || cleanup_temporaries(image_dir));
    counters.add_cleanup(cleanup.removed, cleanup.failed);

    timer.finish();
    info!(final_manifest = %final_manifest.display(), "final manifest saved");

    Ok(Some(VariantReport {
        platform: platform.trim().to_string(),
        strategy,
        container,
        final_manifest,
        provisioning,
        data_preserving,
        telemetry: PipelineSnapshot::from(&counters, &timer),
    }))
}

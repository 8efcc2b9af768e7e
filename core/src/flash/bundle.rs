//! flash/bundle.rs
//! Resolve `flash.xml` and `da.auth`: download-agent directory first, image directory second.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::config::WorkspaceLayout;
use crate::constants::names;
use crate::types::ScatterError;

/// Files the flashing tool is pointed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashBundle {
    pub flash_manifest: PathBuf,
    pub auth_bundle: PathBuf,
}

fn first_existing(candidates: [PathBuf; 2]) -> Option<PathBuf> {
    candidates.into_iter().find(|p| p.is_file())
}

pub fn resolve_flash_manifest(layout: &WorkspaceLayout) -> Option<PathBuf> {
    let found = first_existing([
        layout.download_agent_dir.join(names::FLASH_MANIFEST),
        layout.image_dir.join(names::FLASH_MANIFEST),
    ]);
    match &found {
        Some(p) => info!(flash_manifest = %p.display(), "flash manifest resolved"),
        None => warn!(dir = %layout.image_dir.display(), "flash.xml not found"),
    }
    found
}

/// The bundle is not inspected, only located.
pub fn resolve_auth_bundle(layout: &WorkspaceLayout) -> Option<PathBuf> {
    let found = first_existing([
        layout.download_agent_dir.join(names::AUTH_BUNDLE),
        layout.image_dir.join(names::AUTH_BUNDLE),
    ]);
    match &found {
        Some(p) => info!(auth_bundle = %p.display(), "auth bundle resolved"),
        None => warn!(dir = %layout.image_dir.display(), "da.auth not found"),
    }
    found
}

/// True when the flash manifest text mentions `platform`.
///
/// Guards against flashing a firmware package built for another SoC.
pub fn flash_manifest_targets(flash_manifest: &Path, platform: &str) -> Result<bool, ScatterError> {
    let bytes = fs::read(flash_manifest).map_err(ScatterError::at(flash_manifest))?;
    let text = String::from_utf8_lossy(&bytes);
    let platform = platform.trim();
    let ok = platform.is_empty() || text.contains(platform);
    if !ok {
        warn!(
            platform,
            flash_manifest = %flash_manifest.display(),
            "flash manifest does not target this platform"
        );
    }
    Ok(ok)
}

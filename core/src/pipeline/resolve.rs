//! pipeline/resolve.rs
//! Locate the encrypted container for a platform.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::constants::names;
use crate::types::ScatterError;
use crate::utils::{file_name_of, list_files};

/// Find `<PLATFORM>_Android_scatter.x` in `image_dir`, falling back to the
/// first file (by name) ending in `_Android_scatter.x`.
///
/// Returns `Ok(None)` when nothing matches or `image_dir` does not exist.
/// That is an expected outcome for unsupported platforms.
pub fn resolve_container(image_dir: &Path, platform: &str) -> Result<Option<PathBuf>, ScatterError> {
    if !image_dir.is_dir() {
        warn!(dir = %image_dir.display(), "image directory not found");
        return Ok(None);
    }

    let platform = platform.trim();
    if !platform.is_empty() {
        let exact = image_dir.join(format!("{}{}", platform, names::CONTAINER_SUFFIX));
        if exact.is_file() {
            info!(platform, container = %file_name_of(&exact), "container matched by platform");
            return Ok(Some(exact));
        }
    }

    let fallback = list_files(image_dir)?
        .into_iter()
        .find(|p| file_name_of(p).ends_with(names::CONTAINER_SUFFIX));

    match &fallback {
        Some(p) => info!(platform, container = %file_name_of(p), "container matched by wildcard"),
        None => warn!(platform, dir = %image_dir.display(), "no scatter container found"),
    }
    Ok(fallback)
}

/// Final manifest name for a container: the `.x` extension becomes `.xml`.
pub fn final_name_for(container: &Path) -> String {
    let name = file_name_of(container);
    match name.strip_suffix(".x") {
        Some(stem) => format!("{}.xml", stem),
        None => format!("{}.xml", name),
    }
}

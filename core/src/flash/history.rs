//! flash/history.rs
//! Point the flashing tool's `history.ini` at the resolved bundle.
//!
//! Only the `flashxmlHistory=` and `lastAuthDir=` lines are touched. Matching
//! lines are replaced in place (leading whitespace ignored when matching);
//! missing keys are appended. Every other line is kept as is.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::constants::{history_keys, names};
use crate::flash::bundle::FlashBundle;
use crate::types::ScatterError;
use crate::utils::write_replace;

pub fn rewrite_history(existing: &str, flash_manifest: &str, auth_bundle: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let (mut found_flash, mut found_auth) = (false, false);

    for raw in existing.lines() {
        let stripped = raw.trim_start();
        if stripped.starts_with(history_keys::FLASH_XML) {
            lines.push(format!("{}{}", history_keys::FLASH_XML, flash_manifest));
            found_flash = true;
        } else if stripped.starts_with(history_keys::AUTH_DIR) {
            lines.push(format!("{}{}", history_keys::AUTH_DIR, auth_bundle));
            found_auth = true;
        } else {
            lines.push(raw.to_string());
        }
    }

    if !found_flash {
        lines.push(format!("{}{}", history_keys::FLASH_XML, flash_manifest));
    }
    if !found_auth {
        lines.push(format!("{}{}", history_keys::AUTH_DIR, auth_bundle));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Rewrite `<tools_dir>/history.ini` for `bundle`, using absolute paths.
/// An unreadable or missing history file is treated as empty.
pub fn update_history(tools_dir: &Path, bundle: &FlashBundle) -> Result<PathBuf, ScatterError> {
    let path = tools_dir.join(names::TOOL_HISTORY);
    let existing = fs::read(&path)
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default();

    let flash = absolute(&bundle.flash_manifest);
    let auth = absolute(&bundle.auth_bundle);
    let text = rewrite_history(&existing, &flash, &auth);

    fs::create_dir_all(tools_dir).map_err(ScatterError::at(tools_dir))?;
    write_replace(&path, text.as_bytes())?;
    info!(history = %path.display(), "tool history updated");
    Ok(path)
}

fn absolute(p: &Path) -> String {
    fs::canonicalize(p)
        .unwrap_or_else(|_| p.to_path_buf())
        .display()
        .to_string()
}

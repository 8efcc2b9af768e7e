//! pipeline/cleanup.rs
//! Best-effort removal of pipeline temporaries and stale flow artifacts.
//!
//! Nothing here returns an error: a file that cannot be deleted is logged and
//! counted, and the next run tries again.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::config::WorkspaceLayout;
use crate::constants::names;
use crate::utils::{file_name_of, list_files, remove_best_effort, Removal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub removed: usize,
    pub failed: usize,
}

impl CleanupReport {
    fn record(&mut self, r: Removal) {
        match r {
            Removal::Removed => self.removed += 1,
            Removal::Failed => self.failed += 1,
            Removal::Absent => {}
        }
    }
}

/// Remove the plaintext and dual-slot temporaries from `image_dir`.
pub fn cleanup_temporaries(image_dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();
    for name in [names::PLAINTEXT_TEMP, names::DUAL_SLOT_TEMP] {
        report.record(remove_best_effort(&image_dir.join(name)));
    }
    info!(removed = report.removed, failed = report.failed, "temporary manifests cleaned up");
    report
}

/// Sweep everything a previous flow may have left behind:
/// - any `*_android_scatter.xml`, the two temporaries and a `proinfo` dump in the image dir
/// - any file containing `proinfo` in the readback dir
/// - the flashing tool's `history.ini`
///
/// Names are compared case-insensitively.
pub fn sweep_workspace(layout: &WorkspaceLayout) -> CleanupReport {
    let mut report = CleanupReport::default();

    let final_suffix = names::FINAL_SUFFIX.to_ascii_lowercase();
    let temps = [
        names::PLAINTEXT_TEMP.to_ascii_lowercase(),
        names::DUAL_SLOT_TEMP.to_ascii_lowercase(),
        names::PROINFO_DUMP.to_ascii_lowercase(),
    ];
    for path in list_files(&layout.image_dir).unwrap_or_default() {
        let name = file_name_of(&path).to_ascii_lowercase();
        if name.ends_with(&final_suffix) || temps.contains(&name) {
            report.record(remove_best_effort(&path));
        }
    }

    for path in list_files(&layout.readback_dir).unwrap_or_default() {
        if file_name_of(&path).to_ascii_lowercase().contains(names::PROINFO_DUMP) {
            report.record(remove_best_effort(&path));
        }
    }

    report.record(remove_best_effort(&layout.tools_dir.join(names::TOOL_HISTORY)));

    info!(removed = report.removed, failed = report.failed, "workspace swept");
    report
}

/// Remove the platform's final manifest, then sweep.
pub fn cleanup_after_flow(layout: &WorkspaceLayout, platform: &str) -> CleanupReport {
    let mut report = CleanupReport::default();
    let final_path = layout
        .image_dir
        .join(format!("{}{}", platform.trim(), names::FINAL_SUFFIX));
    report.record(remove_best_effort(&final_path));

    let swept = sweep_workspace(layout);
    report.removed += swept.removed;
    report.failed += swept.failed;
    report
}

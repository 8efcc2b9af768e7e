//! flash/prc.rs
//! Swap `lk.img` and `dtbo.img` in the image directory for the copies kept
//! in the PRC directory.
//!
//! Best effort: nothing here returns an error. An image with no PRC copy is
//! left as it is.

use std::fs;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::WorkspaceLayout;
use crate::constants::names;
use crate::utils::{remove_best_effort, Removal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PrcReport {
    /// Images copied into the image directory.
    pub copied: usize,
    /// Images with no PRC copy.
    pub skipped: usize,
    pub failed: usize,
}

pub fn replace_prc_images(layout: &WorkspaceLayout) -> PrcReport {
    let mut report = PrcReport::default();
    if !layout.image_dir.is_dir() || !layout.prc_dir.is_dir() {
        info!(prc_dir = %layout.prc_dir.display(), "no PRC images to apply");
        return report;
    }

    for name in names::PRC_IMAGES {
        let src = layout.prc_dir.join(name);
        let dst = layout.image_dir.join(name);
        if !src.is_file() {
            report.skipped += 1;
            continue;
        }
        if remove_best_effort(&dst) == Removal::Failed {
            report.failed += 1;
            continue;
        }
        match fs::copy(&src, &dst) {
            Ok(_) => report.copied += 1,
            Err(e) => {
                warn!(src = %src.display(), dst = %dst.display(), error = %e, "could not copy PRC image");
                report.failed += 1;
            }
        }
    }

    info!(copied = report.copied, skipped = report.skipped, failed = report.failed, "PRC images applied");
    report
}

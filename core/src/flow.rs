//! Flow preparation: everything between "device detected" and "start the
//! flashing tool".
//!
//! Early exits (unsupported platform, refused region, missing container or
//! bundle, mismatched flash manifest) are `FlowOutcome` variants, not errors.
//! Errors are reserved for corrupt assets and I/O failures.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::WorkspaceLayout;
use crate::device::{check_region, detect_platform, normalize_platform, DeviceInfo, PropertySource, RegionCheck};
use crate::flash::{
    flash_manifest_targets, replace_prc_images, resolve_auth_bundle, resolve_flash_manifest,
    update_history, FlashBundle, PrcReport,
};
use crate::pipeline::{produce_variants, sweep_workspace, FlashStrategy, VariantReport};
use crate::types::ScatterError;

/// Where the flow stopped.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FlowOutcome {
    Ready {
        device: DeviceInfo,
        report: VariantReport,
        bundle: FlashBundle,
        prc: PrcReport,
    },
    UnsupportedPlatform { raw: String },
    RegionRefused { region: RegionCheck },
    NoContainer { platform: String },
    NoFlashBundle { platform: String },
    PlatformMismatch { platform: String },
}

impl FlowOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, FlowOutcome::Ready { .. })
    }
}

/// Where the platform identifier comes from.
pub enum PlatformSource<'a> {
    Device(&'a dyn PropertySource),
    /// Given explicitly (no device attached); region checks are skipped.
    Explicit(&'a str),
}

/// Sweep stale artifacts, produce the manifest variant, check `flash.xml`
/// targets the platform, swap in the PRC images, resolve `da.auth`, and
/// update the tool history.
pub fn prepare_flow(
    layout: &WorkspaceLayout,
    source: PlatformSource<'_>,
    strategy: FlashStrategy,
) -> Result<FlowOutcome, ScatterError> {
    sweep_workspace(layout);

    let (platform, device) = match source {
        PlatformSource::Device(props) => {
            let device = DeviceInfo::read(props);
            if strategy == FlashStrategy::DataPreserving {
                let region = check_region(props);
                if !region.allows_data_preserving() {
                    return Ok(FlowOutcome::RegionRefused { region });
                }
            }
            match detect_platform(props) {
                Some(p) => (p, device),
                None => {
                    return Ok(FlowOutcome::UnsupportedPlatform {
                        raw: props.get_property(crate::constants::props::PLATFORM),
                    })
                }
            }
        }
        PlatformSource::Explicit(raw) => match normalize_platform(raw) {
            Some(p) => (p, DeviceInfo::default()),
            None => {
                warn!(platform = %raw, "not a supported platform identifier");
                return Ok(FlowOutcome::UnsupportedPlatform { raw: raw.to_string() });
            }
        },
    };

    let Some(report) = produce_variants(layout, &platform, strategy)? else {
        return Ok(FlowOutcome::NoContainer { platform });
    };

    let Some(flash_manifest) = resolve_flash_manifest(layout) else {
        return Ok(FlowOutcome::NoFlashBundle { platform });
    };
    if !flash_manifest_targets(&flash_manifest, &platform)? {
        return Ok(FlowOutcome::PlatformMismatch { platform });
    }

    let prc = replace_prc_images(layout);

    let Some(auth_bundle) = resolve_auth_bundle(layout) else {
        return Ok(FlowOutcome::NoFlashBundle { platform });
    };
    let bundle = FlashBundle { flash_manifest, auth_bundle };

    update_history(&layout.tools_dir, &bundle)?;
    info!(%platform, %strategy, "flow ready for flashing");
    Ok(FlowOutcome::Ready { device, report, bundle, prc })
}

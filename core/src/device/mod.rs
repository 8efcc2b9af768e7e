//! device/mod.rs
//! Decisions taken from device properties before the pipeline runs.
//!
//! The bridge itself (spawning the device tool, polling for presence) is an
//! external collaborator; this module only consumes `PropertySource`.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::constants::props;

/// Read access to device properties. Returns an empty string when the
/// property is unset or the device is unreachable.
pub trait PropertySource {
    fn get_property(&self, name: &str) -> String;
}

impl PropertySource for HashMap<String, String> {
    fn get_property(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl<F> PropertySource for F
where
    F: Fn(&str) -> String,
{
    fn get_property(&self, name: &str) -> String {
        self(name)
    }
}

/// Normalize a raw platform property: trimmed, uppercased, must start with `MT`.
pub fn normalize_platform(raw: &str) -> Option<String> {
    let platform = raw.trim().to_ascii_uppercase();
    if platform.starts_with("MT") {
        Some(platform)
    } else {
        None
    }
}

/// Read and validate the SoC platform identifier (e.g. `MT6789`).
pub fn detect_platform(source: &dyn PropertySource) -> Option<String> {
    let raw = source.get_property(props::PLATFORM);
    match normalize_platform(&raw) {
        Some(platform) => {
            info!(%platform, "platform detected");
            Some(platform)
        }
        None => {
            warn!(platform = %raw.trim(), "device is not on a supported platform");
            None
        }
    }
}

/// Firmware region reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "region", rename_all = "snake_case")]
pub enum RegionCheck {
    /// `ROW` or unset: the data-preserving flow may run.
    Global,
    /// `PRC` firmware: the data-preserving flow is refused.
    ChinaRom,
    /// Any other value: refused.
    Unknown { value: String },
}

impl RegionCheck {
    pub fn allows_data_preserving(&self) -> bool {
        matches!(self, RegionCheck::Global)
    }
}

pub fn check_region(source: &dyn PropertySource) -> RegionCheck {
    let region = source.get_property(props::REGION).trim().to_ascii_uppercase();
    let check = match region.as_str() {
        "" | "ROW" => RegionCheck::Global,
        "PRC" => RegionCheck::ChinaRom,
        _ => RegionCheck::Unknown { value: region },
    };
    if !check.allows_data_preserving() {
        warn!(?check, "region does not allow a data-preserving upgrade");
    }
    check
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub hw_version: String,
    pub cpu_info: String,
}

impl DeviceInfo {
    pub fn read(source: &dyn PropertySource) -> Self {
        let info = Self {
            hw_version: source.get_property(props::HW_VERSION).trim().to_string(),
            cpu_info: source.get_property(props::CPU_INFO).trim().to_string(),
        };
        info!(hw = %info.hw_version, cpu = %info.cpu_info, "device info");
        info
    }
}

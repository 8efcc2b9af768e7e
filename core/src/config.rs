// ## src/config.rs

//! Workspace layout: the directories the pipeline reads from and writes to.
//!
//! Defaults hang off one base directory:
//!
//! ```text
//! <base>/image/                  encrypted containers, final manifests, flash.xml, da.auth
//! <base>/image/download_agent/   preferred location of flash.xml and da.auth
//! <base>/tools/                  flashing tool working dir (history.ini)
//! <base>/tools/Readback/         proinfo dumps read back from the device
//! <base>/tools/PRC/              replacement lk.img / dtbo.img copied into image/
//! ```
//!
//! A JSON file can override any of these. Missing keys keep the default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read layout file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid layout file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceLayout {
    pub image_dir: PathBuf,
    pub download_agent_dir: PathBuf,
    pub tools_dir: PathBuf,
    pub readback_dir: PathBuf,
    pub prc_dir: PathBuf,
}

/// Partial layout as read from JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutOverrides {
    image_dir: Option<PathBuf>,
    download_agent_dir: Option<PathBuf>,
    tools_dir: Option<PathBuf>,
    readback_dir: Option<PathBuf>,
    prc_dir: Option<PathBuf>,
}

impl WorkspaceLayout {
    /// Default layout under `base`.
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        let image_dir = base.join("image");
        let tools_dir = base.join("tools");
        Self {
            download_agent_dir: image_dir.join("download_agent"),
            readback_dir: tools_dir.join("Readback"),
            prc_dir: tools_dir.join("PRC"),
            image_dir,
            tools_dir,
        }
    }

    /// Layout where everything lives in one flat directory. Handy for tests
    /// and for running the pipeline against an unpacked firmware folder.
    pub fn flat(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            image_dir: dir.clone(),
            download_agent_dir: dir.join("download_agent"),
            tools_dir: dir.clone(),
            prc_dir: dir.join("PRC"),
            readback_dir: dir,
        }
    }

    /// Apply overrides from a JSON file on top of `self`.
    ///
    /// Relative paths in the file are resolved against the file's directory.
    pub fn with_overrides_from(mut self, path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let o: LayoutOverrides = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let anchor = path.parent().unwrap_or_else(|| Path::new("."));
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { anchor.join(p) };

        if let Some(p) = o.image_dir {
            self.image_dir = resolve(p);
        }
        if let Some(p) = o.download_agent_dir {
            self.download_agent_dir = resolve(p);
        }
        if let Some(p) = o.tools_dir {
            self.tools_dir = resolve(p);
        }
        if let Some(p) = o.readback_dir {
            self.readback_dir = resolve(p);
        }
        if let Some(p) = o.prc_dir {
            self.prc_dir = resolve(p);
        }
        Ok(self)
    }
}

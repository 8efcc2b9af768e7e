use std::io;
use std::path::{Path, PathBuf};

use crate::config::ConfigError;
use crate::container::FormatError;
use crate::crypto::CryptoError;
use crate::manifest::ManifestError;

/// Unified error covering I/O, container format, manifest and configuration failures.
/// - Ergonomic `From<T>` impls enable `?` across the pipeline.
/// - `NotFound` conditions are not errors; stages return `Option` for those.
#[derive(Debug)]
pub enum ScatterError {
    /// I/O error without a path attached.
    Io(io::Error),

    /// I/O error on a specific file or directory.
    IoAt { path: PathBuf, source: io::Error },

    /// Container decoding failed (corrupt or tampered asset).
    Format(FormatError),

    /// Cipher error outside of decoding (encoder side).
    Crypto(CryptoError),

    /// Manifest could not be parsed or serialized.
    Manifest(ManifestError),

    /// Workspace layout could not be loaded.
    Config(ConfigError),
}

impl ScatterError {
    /// Wrap an I/O error with the path it happened on.
    pub fn at(path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> ScatterError {
        let path = path.as_ref().to_path_buf();
        move |source| ScatterError::IoAt { path, source }
    }

    /// True for failures that mean the encrypted asset itself is bad.
    pub fn is_format(&self) -> bool {
        matches!(self, ScatterError::Format(_))
    }
}

impl std::fmt::Display for ScatterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScatterError::Io(e) => write!(f, "I/O error: {}", e),
            ScatterError::IoAt { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            ScatterError::Format(e) => write!(f, "container format error: {}", e),
            ScatterError::Crypto(e) => write!(f, "crypto error: {}", e),
            ScatterError::Manifest(e) => write!(f, "manifest error: {}", e),
            ScatterError::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for ScatterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScatterError::Io(e) => Some(e),
            ScatterError::IoAt { source, .. } => Some(source),
            ScatterError::Format(e) => Some(e),
            ScatterError::Crypto(e) => Some(e),
            ScatterError::Manifest(e) => Some(e),
            ScatterError::Config(e) => Some(e),
        }
    }
}

impl From<io::Error> for ScatterError {
    fn from(e: io::Error) -> Self {
        ScatterError::Io(e)
    }
}

impl From<FormatError> for ScatterError {
    fn from(e: FormatError) -> Self {
        ScatterError::Format(e)
    }
}

impl From<CryptoError> for ScatterError {
    fn from(e: CryptoError) -> Self {
        ScatterError::Crypto(e)
    }
}

impl From<ManifestError> for ScatterError {
    fn from(e: ManifestError) -> Self {
        ScatterError::Manifest(e)
    }
}

impl From<ConfigError> for ScatterError {
    fn from(e: ConfigError) -> Self {
        ScatterError::Config(e)
    }
}

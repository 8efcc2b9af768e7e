//! File helpers shared by the pipeline and flash preparation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::types::ScatterError;

/// Write `bytes` to a sibling temp file, then rename it over `path`.
///
/// A crash leaves either the old file or the new one, plus at worst a stray
/// `.<name>.tmp` that the next write replaces.
pub fn write_replace(path: &Path, bytes: &[u8]) -> Result<(), ScatterError> {
    let tmp = temp_sibling(path);
    fs::write(&tmp, bytes).map_err(ScatterError::at(&tmp))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(ScatterError::IoAt { path: path.to_path_buf(), source: e });
    }
    debug!(path = %path.display(), len = bytes.len(), "file written");
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Result of a best-effort delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    Absent,
    Failed,
}

/// Delete a regular file if present. Failures are logged, never returned.
pub fn remove_best_effort(path: &Path) -> Removal {
    if !path.is_file() {
        return Removal::Absent;
    }
    match fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "file removed");
            Removal::Removed
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Removal::Absent,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not remove file");
            Removal::Failed
        }
    }
}

/// Regular files directly inside `dir`, sorted by name. A missing directory is empty.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScatterError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ScatterError::IoAt { path: dir.to_path_buf(), source: e }),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(ScatterError::at(dir))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// File name as UTF-8, lossy.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_replace_overwrites_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("a.xml");
        write_replace(&p, b"one").unwrap();
        write_replace(&p, b"two").unwrap();
        assert_eq!(fs::read(&p).unwrap(), b"two");
        assert_eq!(list_files(dir.path()).unwrap(), vec![p]);
    }

    #[test]
    fn remove_best_effort_reports_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(remove_best_effort(&dir.path().join("nope")), Removal::Absent);
    }

    #[test]
    fn list_files_of_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(&dir.path().join("missing")).unwrap().is_empty());
    }
}

//! Host filesystem helpers.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::errors::{PressboxError, PressboxResult};

/// Final path component as a string, with a stable fallback for paths that
/// end in `..` or a root.
pub(crate) fn dir_basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "project".to_string())
}

pub(crate) fn ensure_dir(path: &Path) -> PressboxResult<()> {
    fs::create_dir_all(path)
        .map_err(|e| PressboxError::Storage(format!("failed to create {}: {e}", path.display())))
}

/// Recursively copy `source` into `target`, preserving relative structure.
/// Existing files are overwritten.
pub(crate) fn copy_dir_recursive(source: &Path, target: &Path) -> PressboxResult<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| {
            PressboxError::Storage(format!("failed to walk {}: {e}", source.display()))
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| PressboxError::Internal(e.to_string()))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest).map_err(|e| {
                PressboxError::Storage(format!("failed to create {}: {e}", dest.display()))
            })?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    PressboxError::Storage(format!("failed to create {}: {e}", parent.display()))
                })?;
            }
            fs::copy(entry.path(), &dest).map_err(|e| {
                PressboxError::Storage(format!(
                    "failed to copy {} to {}: {e}",
                    entry.path().display(),
                    dest.display()
                ))
            })?;
        }
    }
    Ok(())
}

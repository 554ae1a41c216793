//! Low-level file placement for extracted package content.

use std::path::{Component, Path};

use crate::error::{AgentPmError, Result};
use crate::extract::ExtractedFile;

fn file_write_error(path: &Path, e: std::io::Error) -> AgentPmError {
    AgentPmError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Ensure the parent directory of a path exists
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| file_write_error(parent, e))?;
    }
    Ok(())
}

/// Write one file, creating parent directories as needed
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, content).map_err(|e| file_write_error(path, e))
}

/// Write extracted files under a directory, preserving their relative paths.
///
/// Entries with path traversal components are rejected; extraction already
/// filters these, so hitting one here means the payload bypassed it.
pub fn write_tree(dir: &Path, files: &[ExtractedFile]) -> Result<()> {
    for file in files {
        if !is_clean_relative(&file.relative_path) {
            return Err(AgentPmError::FileWriteFailed {
                path: file.relative_path.display().to_string(),
                reason: "path escapes the installation directory".to_string(),
            });
        }
        write_file(&dir.join(&file.relative_path), &file.content)?;
    }
    Ok(())
}

fn is_clean_relative(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Remove an installed artifact: a directory root or a single file.
///
/// A target that is already absent is fine; the lockfile is the source of
/// truth and the filesystem only a projection of it.
pub fn remove_artifact(path: &Path) -> Result<bool> {
    if path.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| file_write_error(path, e))?;
        Ok(true)
    } else if path.exists() {
        std::fs::remove_file(path).map_err(|e| file_write_error(path, e))?;
        Ok(true)
    } else {
        Ok(false)
    }
}

//! Command implementations for the agentpm CLI
//!
//! Each submodule wires parsed CLI arguments to the engine: it builds the
//! registry client and installer, runs the operation, and prints the result.

pub mod collection;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod version;

use std::path::PathBuf;

use crate::error::{AgentPmError, Result};

/// Resolve the project root for a command: the `--project-root` flag (or
/// `AGENTPM_PROJECT_ROOT`) when given, otherwise the current directory.
pub(crate) fn resolve_project_root(project_root: Option<PathBuf>) -> Result<PathBuf> {
    match project_root {
        Some(root) => Ok(root),
        None => std::env::current_dir().map_err(|e| AgentPmError::IoError {
            message: format!("Failed to get current directory: {e}"),
        }),
    }
}

//! Install orchestration: the only component with side effects on the
//! filesystem and the lock store.
//!
//! Every step after the fetch is ordered so the lockfile write comes last: a
//! crash mid-install may leave orphan files with no lock entry (cleaned up by
//! re-running install, which is idempotent), but never a lock entry pointing
//! at files that were never written.
//!
//! Operations are single-threaded read-modify-write over the lockfile and,
//! for hook packages, the host settings document; concurrent invocations
//! against the same project root must be serialized by the caller.

pub mod file_ops;
pub mod skill;

mod install;
mod uninstall;

use std::path::PathBuf;

use crate::lockfile::CollectionProvenance;
use crate::registry::RegistryClient;
use crate::router::Format;

/// Options for a single package install
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Conversion target (`--as`); affects placement and the download
    /// request, never the recorded package identity
    pub target_format: Option<Format>,
    /// Explicit version, when not given inline in the reference
    pub explicit_version: Option<String>,
    /// Version from a parsed spec (collection plan entry)
    pub spec_version: Option<String>,
    /// Only the lockfile may answer version resolution
    pub frozen: bool,
    /// Enumerate without any network or filesystem effect
    pub dry_run: bool,
    /// Provenance recorded when installing as a collection member
    pub from_collection: Option<CollectionProvenance>,
}

/// Result of an install operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { version: String },
    /// Explicit no-op: the lock entry already satisfies the request
    AlreadySatisfied { version: String },
    DryRun { version: String },
}

impl InstallOutcome {
    pub fn version(&self) -> &str {
        match self {
            InstallOutcome::Installed { version }
            | InstallOutcome::AlreadySatisfied { version }
            | InstallOutcome::DryRun { version } => version,
        }
    }
}

/// End-to-end install/uninstall engine for one project root.
pub struct Installer<'a> {
    project_root: PathBuf,
    registry: &'a dyn RegistryClient,
}

impl<'a> Installer<'a> {
    pub fn new(project_root: impl Into<PathBuf>, registry: &'a dyn RegistryClient) -> Self {
        Self {
            project_root: project_root.into(),
            registry,
        }
    }

    pub fn project_root(&self) -> &std::path::Path {
        &self.project_root
    }

    pub(crate) fn registry(&self) -> &dyn RegistryClient {
        self.registry
    }
}

/// Informational line on stderr; degraded conditions are reported here and
/// never block completion.
pub(crate) fn info(message: &str) {
    eprintln!("{} {}", console::style("info:").dim(), message);
}

/// Warning line on stderr
pub(crate) fn warn(message: &str) {
    eprintln!("{} {}", console::style("warning:").yellow().bold(), message);
}

/// The format files are actually placed for: a conversion target overrides
/// the native format, except `canonical`, which skips conversion and routes
/// as native.
pub(crate) fn effective_format(target: Option<Format>, native: Format) -> Format {
    match target {
        None | Some(Format::Canonical) => native,
        Some(f) => f,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_format_defaults_to_native() {
        assert_eq!(effective_format(None, Format::Cursor), Format::Cursor);
    }

    #[test]
    fn test_effective_format_conversion_target_wins() {
        assert_eq!(
            effective_format(Some(Format::Claude), Format::Cursor),
            Format::Claude
        );
    }

    #[test]
    fn test_effective_format_canonical_routes_as_native() {
        assert_eq!(
            effective_format(Some(Format::Canonical), Format::Windsurf),
            Format::Windsurf
        );
    }
}

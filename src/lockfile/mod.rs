//! Lockfile (agentpm.lock): the durable record of installed packages.
//!
//! The lockfile is the single source of truth for "what is installed"; the
//! filesystem is a projection of it, not the reverse. It is created lazily on
//! first install and rewritten atomically (write-temp-then-rename) on every
//! mutation, with `generated_at` advancing each time.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{AgentPmError, Result};
use crate::router::{Format, Subtype};

/// Lockfile filename within the project root
pub const LOCKFILE_NAME: &str = "agentpm.lock";

/// Current lockfile schema version
pub const LOCKFILE_VERSION: u32 = 1;

/// Current format version string
pub const FORMAT_VERSION: &str = "1.0";

/// Hook bookkeeping for packages merged into the host settings document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HookMetadata {
    /// Event names the package contributed entries to
    pub events: Vec<String>,
    /// Synthetic correlation tag, `<packageId>@<version>`
    pub hook_id: String,
}

/// Provenance pointer for packages installed as part of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionProvenance {
    pub scope: String,
    pub name_slug: String,
    pub version: String,
}

/// One installed package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockEntry {
    /// Resolved semantic version
    pub version: String,
    /// Exact URL the artifact was fetched from
    pub resolved_source: String,
    /// `algorithm-hexdigest` over the raw downloaded bytes; set only after a
    /// successful download, never guessed
    pub integrity: String,
    /// The package's native classification as declared by its publisher.
    /// A format-conversion request changes where files are written, never
    /// what is recorded here.
    pub format: Format,
    pub subtype: Subtype,
    /// Exact location written, relative to the project root; authoritative
    /// for uninstall
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installed_path: Option<PathBuf>,
    /// Present only for packages merged into the host settings document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_metadata: Option<HookMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_collection: Option<CollectionProvenance>,
}

/// Lockfile structure (agentpm.lock)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lockfile {
    pub format_version: String,
    pub lockfile_version: u32,
    /// Installed packages keyed by package id (`scope/name`); a BTreeMap
    /// keeps serialization order stable and ids unique
    pub packages: BTreeMap<String, LockEntry>,
    pub generated_at: DateTime<Utc>,
}

impl Default for Lockfile {
    fn default() -> Self {
        Self::new()
    }
}

impl Lockfile {
    pub fn new() -> Self {
        Self {
            format_version: FORMAT_VERSION.to_string(),
            lockfile_version: LOCKFILE_VERSION,
            packages: BTreeMap::new(),
            generated_at: Utc::now(),
        }
    }

    /// Lockfile path for a project root
    pub fn path(project_root: &Path) -> PathBuf {
        project_root.join(LOCKFILE_NAME)
    }

    /// Load the lockfile if one exists
    pub fn load(project_root: &Path) -> Result<Option<Self>> {
        let path = Self::path(project_root);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| AgentPmError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let lockfile = serde_json::from_str(&content).map_err(|e| AgentPmError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(lockfile))
    }

    /// Load the lockfile or start a fresh one (lazy creation on first install)
    pub fn load_or_new(project_root: &Path) -> Result<Self> {
        Ok(Self::load(project_root)?.unwrap_or_default())
    }

    pub fn entry(&self, id: &str) -> Option<&LockEntry> {
        self.packages.get(id)
    }

    /// Create or replace an entry; `generated_at` advances on every mutation
    pub fn upsert(&mut self, id: impl Into<String>, entry: LockEntry) {
        self.packages.insert(id.into(), entry);
        self.generated_at = Utc::now();
    }

    /// Remove an entry, returning it for cleanup driven by its recorded state
    pub fn remove(&mut self, id: &str) -> Option<LockEntry> {
        let removed = self.packages.remove(id);
        if removed.is_some() {
            self.generated_at = Utc::now();
        }
        removed
    }

    /// Persist atomically: write to a temp file in the same directory, then
    /// rename over the destination.
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let path = Self::path(project_root);
        let json = serde_json::to_string_pretty(self).map_err(|e| AgentPmError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let write_failed = |reason: String| AgentPmError::FileWriteFailed {
            path: path.display().to_string(),
            reason,
        };

        let mut tmp =
            NamedTempFile::new_in(project_root).map_err(|e| write_failed(e.to_string()))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| tmp.write_all(b"\n"))
            .map_err(|e| write_failed(e.to_string()))?;
        tmp.persist(&path)
            .map_err(|e| write_failed(e.to_string()))?;
        Ok(())
    }
}

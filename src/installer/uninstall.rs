//! Uninstall: the mirror of install, driven by the recorded lock entry.
//!
//! Filesystem and settings-document cleanup happen first, using the entry's
//! recorded state; the lock removal is finalized only afterwards. The engine
//! refuses to guess a deletion target: a non-hook entry without an install
//! path fails rather than silently skipping.

use crate::error::{AgentPmError, Result};
use crate::hooks;
use crate::installer::{Installer, file_ops, info, warn};
use crate::lockfile::Lockfile;
use crate::package_ref::PackageRef;

impl Installer<'_> {
    /// Remove an installed package and its lock entry.
    pub fn uninstall(&self, reference: &str) -> Result<()> {
        let parsed = PackageRef::parse(reference)?;
        let id = parsed.id;

        let mut lockfile = Lockfile::load(self.project_root())?.ok_or_else(|| {
            AgentPmError::PackageNotInstalled { id: id.clone() }
        })?;
        let entry = lockfile
            .entry(&id)
            .cloned()
            .ok_or_else(|| AgentPmError::PackageNotInstalled { id: id.clone() })?;

        if let Some(hook_metadata) = &entry.hook_metadata {
            if !hooks::unmerge(self.project_root(), hook_metadata)? {
                warn(&format!(
                    "{id}: settings document is missing; removing the lock entry anyway"
                ));
            }
        } else {
            let relative = entry
                .installed_path
                .as_ref()
                .ok_or_else(|| AgentPmError::UninstallPathUnknown { id: id.clone() })?;
            if !file_ops::remove_artifact(&self.project_root().join(relative))? {
                info(&format!(
                    "{id}: {} was already absent",
                    relative.display()
                ));
            }
        }

        lockfile.remove(&id);
        lockfile.save(self.project_root())?;
        Ok(())
    }
}

//! The end-to-end install sequence.

use std::path::{Path, PathBuf};

use crate::error::{AgentPmError, Result};
use crate::extract::{self, ExtractedFile};
use crate::hash;
use crate::hooks;
use crate::installer::{
    InstallOptions, InstallOutcome, Installer, effective_format, file_ops, info, skill,
};
use crate::lockfile::{LockEntry, Lockfile};
use crate::package_ref::{PackageRef, base_name};
use crate::resolver::{self, LATEST, ResolveRequest};
use crate::router::{self, AGENTS_FILE, Destination, Format, SKILL_MANIFEST, Subtype};

impl Installer<'_> {
    /// Install one package: parse, resolve, fetch, extract, route, place,
    /// then record — the lockfile write is the final step.
    pub fn install(&self, reference: &str, options: &InstallOptions) -> Result<InstallOutcome> {
        let parsed = PackageRef::parse(reference)?;
        let id = parsed.id;
        let explicit = parsed
            .version
            .as_deref()
            .or(options.explicit_version.as_deref());

        let mut lockfile = Lockfile::load_or_new(self.project_root())?;
        let locked = lockfile.entry(&id).cloned();

        let resolved = resolver::resolve_version(&ResolveRequest {
            package_id: &id,
            explicit_version: explicit,
            spec_version: options.spec_version.as_deref(),
            locked_version: locked.as_ref().map(|e| e.version.as_str()),
            frozen: options.frozen,
        })?;

        // Offline no-op path: lock entry already satisfies the request, so
        // all network and filesystem work is skipped.
        if let Some(entry) = &locked {
            if resolver::version_satisfied(&resolved, Some(&entry.version))
                && self.entry_satisfies(entry, &id, options.target_format)?
            {
                return Ok(InstallOutcome::AlreadySatisfied {
                    version: entry.version.clone(),
                });
            }
        }

        if options.dry_run {
            info(&format!("dry run: would install {id}@{resolved}"));
            return Ok(InstallOutcome::DryRun { version: resolved });
        }

        let metadata = self.registry().package_metadata(&id)?;
        let version = if resolved == LATEST {
            metadata.latest_version.clone()
        } else {
            resolved
        };

        // Requesting "latest" needed the registry to concretize the version;
        // the lock entry may turn out to satisfy it after all.
        if let Some(entry) = &locked {
            if entry.version == version
                && self.entry_satisfies(entry, &id, options.target_format)?
            {
                return Ok(InstallOutcome::AlreadySatisfied { version });
            }
        }

        let version_meta = self.registry().version_metadata(&id, &version)?;
        let bytes = self.registry().download(
            &version_meta.download_url,
            conversion_request(options.target_format, metadata.native_format),
        )?;
        let integrity = hash::integrity(&bytes);

        let (mut files, degraded) = extract::extract(&bytes, &id);
        if degraded {
            info(&format!(
                "{id}: payload is not an archive container, installing as a single file"
            ));
        }

        let subtype = metadata.native_subtype;
        let (installed_path, hook_metadata) = if subtype == Subtype::Hook {
            // The fragment is selected and validated before the settings
            // document is touched; an upgrade to a broken payload must not
            // strip the working entries of the version being replaced.
            let fragment = hook_fragment(&id, &files)?;
            let previous = locked.as_ref().and_then(|e| e.hook_metadata.as_ref());
            let meta = hooks::merge(self.project_root(), &id, &version, fragment, previous)?;
            (None, Some(meta))
        } else {
            let format = effective_format(options.target_format, metadata.native_format);
            let dest = self.route_for(&id, format, subtype, locked.as_ref())?;
            let path = self.place_files(&id, subtype, &dest, &mut files)?;
            // A re-target moved the artifact; the previously recorded one
            // must not outlive its lock entry.
            if let Some(previous) = locked.as_ref().and_then(|e| e.installed_path.as_deref()) {
                if previous != path.as_path() {
                    file_ops::remove_artifact(&self.project_root().join(previous))?;
                }
            }
            (Some(path), None)
        };

        // Usage accounting is fire-and-forget
        if let Err(e) = self.registry().record_download(
            &id,
            &version,
            effective_format(options.target_format, metadata.native_format),
        ) {
            info(&format!("download accounting failed: {e}"));
        }

        let entry = LockEntry {
            version: version.clone(),
            resolved_source: version_meta.download_url,
            integrity,
            // Native identity, never the conversion target
            format: metadata.native_format,
            subtype,
            installed_path,
            hook_metadata,
            from_collection: options.from_collection.clone(),
        };
        lockfile.upsert(&id, entry);
        lockfile.save(self.project_root())?;

        Ok(InstallOutcome::Installed { version })
    }

    /// Whether a lock entry satisfies a request for the same version,
    /// keyed on effective format: the routed destination must match the
    /// recorded install path, so a re-run with a different `--as` rewrites
    /// at the new destination instead of no-opping.
    fn entry_satisfies(
        &self,
        entry: &LockEntry,
        id: &str,
        target_format: Option<Format>,
    ) -> Result<bool> {
        if entry.subtype == Subtype::Hook {
            // Hooks live in the host settings document regardless of any
            // conversion target; the tag must still be present there, so a
            // wiped document gets repaired instead of no-opped.
            return match entry.hook_metadata.as_ref() {
                Some(meta) => hooks::is_merged(self.project_root(), meta),
                None => Ok(false),
            };
        }

        let Some(installed) = entry.installed_path.as_ref() else {
            return Ok(false);
        };
        let format = effective_format(target_format, entry.format);
        let dest = self.route_for(id, format, entry.subtype, Some(entry))?;
        Ok(destination_candidates(id, entry.subtype, &dest)
            .iter()
            .any(|candidate| candidate == installed))
    }

    /// Route a destination, resolving the shared `AGENTS.md` conflict rule:
    /// the root file is "taken" only when it exists and is not the recorded
    /// install path of this same package.
    pub(crate) fn route_for(
        &self,
        id: &str,
        format: Format,
        subtype: Subtype,
        prior: Option<&LockEntry>,
    ) -> Result<Destination> {
        let agents_file_taken = format == Format::Agents
            && self.project_root().join(AGENTS_FILE).exists()
            && prior.and_then(|e| e.installed_path.as_deref()) != Some(Path::new(AGENTS_FILE));
        router::route(format, subtype, id, agents_file_taken)
    }

    /// Write extracted files at their destination and return the recorded
    /// install path (a file for single-file installs, a directory root for
    /// skills and multi-file payloads).
    fn place_files(
        &self,
        id: &str,
        subtype: Subtype,
        dest: &Destination,
        files: &mut Vec<ExtractedFile>,
    ) -> Result<PathBuf> {
        let root = self.project_root();

        // The per-package skill directory is identified by its destination
        // shape, a directory of its own with the fixed manifest filename. A
        // skill converted into a shared single-file layout (windsurf rules)
        // installs like any other artifact below.
        if subtype == Subtype::Skill && dest.filename.as_deref() == Some(SKILL_MANIFEST) {
            skill::ensure_manifest(id, files)?;
            file_ops::write_tree(&root.join(&dest.dir), files)?;
            return Ok(dest.dir.clone());
        }

        if let (1, Some(file_path)) = (files.len(), dest.file_path()) {
            file_ops::write_file(&root.join(&file_path), &files[0].content)?;
            return Ok(file_path);
        }

        // Multi-file payload for a single-file-shaped destination: install
        // into a per-package directory so uninstall has one deletion target.
        let install_dir = if dest.dir.ends_with(base_name(id)) {
            dest.dir.clone()
        } else {
            dest.dir.join(base_name(id))
        };
        file_ops::write_tree(&root.join(&install_dir), files)?;
        Ok(install_dir)
    }
}

/// Conversion is requested from the registry only when the target differs
/// from the package's native format; `canonical` skips conversion entirely.
fn conversion_request(target: Option<Format>, native: Format) -> Option<Format> {
    match target {
        Some(Format::Canonical) | None => None,
        Some(f) if f == native => None,
        Some(f) => Some(f),
    }
}

/// Pick the hook fragment out of the extracted payload.
fn hook_fragment<'f>(id: &str, files: &'f [ExtractedFile]) -> Result<&'f [u8]> {
    if let [only] = files {
        return Ok(&only.content);
    }
    files
        .iter()
        .find(|f| f.relative_path.file_name().is_some_and(|n| n == "hooks.json"))
        .map(|f| f.content.as_slice())
        .ok_or_else(|| AgentPmError::HookFragmentInvalid {
            id: id.to_string(),
            reason: "multi-file payload without a hooks.json entry".to_string(),
        })
}

/// The install paths a destination can legitimately record, mirroring the
/// placement rules in `place_files`.
fn destination_candidates(id: &str, subtype: Subtype, dest: &Destination) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if subtype == Subtype::Skill && dest.filename.as_deref() == Some(SKILL_MANIFEST) {
        candidates.push(dest.dir.clone());
        return candidates;
    }
    if let Some(file_path) = dest.file_path() {
        candidates.push(file_path);
    }
    // Multi-file installs record the per-package directory instead
    if dest.dir.ends_with(base_name(id)) {
        candidates.push(dest.dir.clone());
    } else {
        candidates.push(dest.dir.join(base_name(id)));
    }
    candidates
}

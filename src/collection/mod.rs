//! Collection installation: sequential orchestration of an ordered plan.
//!
//! Members are installed strictly in list order so failure aggregation is
//! deterministic and ordering-dependent installs (a base rule before a hook
//! that references it) are respected — a deliberate simplicity-over-
//! throughput tradeoff for a local, low-cardinality operation.

use console::style;

use crate::error::{AgentPmError, Result};
use crate::installer::{InstallOptions, InstallOutcome, Installer, warn};
use crate::lockfile::CollectionProvenance;
use crate::progress::CollectionProgress;
use crate::registry::CollectionManifest;
use crate::router::Format;

/// Options for a collection install
#[derive(Debug, Clone, Default)]
pub struct CollectionOptions {
    pub target_format: Option<Format>,
    pub frozen: bool,
    pub dry_run: bool,
}

/// Aggregated result of a collection install.
///
/// The operation is successful iff zero required members failed; optional
/// failures only show up in the counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionOutcome {
    pub installed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Install every member of a collection in plan order.
///
/// A required member failure aborts immediately; members installed before it
/// keep their lock entries (no automatic rollback). Optional failures are
/// logged and counted. Dry-run enumerates the plan without any filesystem
/// effect.
pub fn install_collection(
    installer: &Installer<'_>,
    reference: &str,
    options: &CollectionOptions,
) -> Result<CollectionOutcome> {
    let manifest = installer.registry().collection(reference)?;

    if options.dry_run {
        enumerate_plan(&manifest);
        return Ok(CollectionOutcome::default());
    }

    let provenance = CollectionProvenance {
        scope: manifest.scope.clone(),
        name_slug: manifest.name_slug.clone(),
        version: manifest.version.clone(),
    };

    let mut outcome = CollectionOutcome::default();
    let progress = CollectionProgress::new(manifest.packages.len() as u64);

    for member in &manifest.packages {
        progress.start_member(&member.package_id);

        let member_options = InstallOptions {
            target_format: options.target_format,
            spec_version: Some(member.version.clone()),
            frozen: options.frozen,
            from_collection: Some(provenance.clone()),
            ..InstallOptions::default()
        };

        match installer.install(&member.package_id, &member_options) {
            Ok(InstallOutcome::Installed { .. }) => outcome.installed += 1,
            Ok(InstallOutcome::AlreadySatisfied { .. }) => outcome.skipped += 1,
            Ok(InstallOutcome::DryRun { .. }) => outcome.skipped += 1,
            Err(e) if member.required => {
                progress.abandon();
                return Err(AgentPmError::RequiredCollectionMemberFailed {
                    collection: reference.to_string(),
                    member: member.package_id.clone(),
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                warn(&format!(
                    "optional member {} failed: {e}",
                    member.package_id
                ));
                outcome.failed += 1;
            }
        }
        progress.member_done();
    }

    progress.finish();
    Ok(outcome)
}

fn enumerate_plan(manifest: &CollectionManifest) {
    println!(
        "{} @{}/{} {} ({} members)",
        style("collection").green().bold(),
        manifest.scope,
        manifest.name_slug,
        manifest.version,
        manifest.packages.len()
    );
    for member in &manifest.packages {
        let requirement = if member.required { "required" } else { "optional" };
        println!(
            "  {} {}@{} [{}/{}] ({})",
            style("-").dim(),
            member.package_id,
            member.version,
            member.format,
            member.subtype,
            requirement
        );
    }
}

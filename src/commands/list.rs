//! List command implementation
//!
//! Prints every package recorded in the lockfile, with install locations
//! when `--paths` is given.

use std::path::PathBuf;

use console::Style;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::lockfile::{LockEntry, Lockfile};
use crate::router::SETTINGS_DOCUMENT;

/// Run the list command
pub fn run(project_root: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let root = super::resolve_project_root(project_root)?;

    let Some(lockfile) = Lockfile::load(&root)? else {
        println!("No packages installed.");
        return Ok(());
    };
    if lockfile.packages.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }

    println!("Installed packages ({}):", lockfile.packages.len());
    println!();

    for (id, entry) in &lockfile.packages {
        display_entry(id, entry, args.paths);
    }

    Ok(())
}

fn display_entry(id: &str, entry: &LockEntry, with_paths: bool) {
    println!(
        "  {} {} [{}/{}]",
        Style::new().bold().yellow().apply_to(id),
        entry.version,
        Style::new().cyan().apply_to(entry.format),
        Style::new().cyan().apply_to(entry.subtype),
    );

    if let Some(provenance) = &entry.from_collection {
        println!(
            "    {} @{}/{} {}",
            Style::new().bold().apply_to("Collection:"),
            provenance.scope,
            provenance.name_slug,
            provenance.version
        );
    }

    if with_paths {
        if let Some(hook_metadata) = &entry.hook_metadata {
            println!(
                "    {} {} ({})",
                Style::new().bold().apply_to("Merged into:"),
                SETTINGS_DOCUMENT,
                hook_metadata.events.join(", ")
            );
        }
        if let Some(path) = &entry.installed_path {
            println!(
                "    {} {}",
                Style::new().bold().apply_to("Path:"),
                path.display()
            );
        }
    }
}

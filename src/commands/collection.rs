//! Install-collection command implementation

use std::path::PathBuf;

use console::style;

use crate::cli::InstallCollectionArgs;
use crate::collection::{self, CollectionOptions};
use crate::error::Result;
use crate::installer::Installer;
use crate::registry::HttpRegistryClient;

/// Run the install-collection command
pub fn run(project_root: Option<PathBuf>, args: InstallCollectionArgs) -> Result<()> {
    let root = super::resolve_project_root(project_root)?;
    let registry = HttpRegistryClient::new()?;
    let installer = Installer::new(&root, &registry);

    let options = CollectionOptions {
        target_format: args.target_format,
        frozen: args.frozen,
        dry_run: args.dry_run,
    };

    let outcome = collection::install_collection(&installer, &args.collection, &options)?;

    if args.dry_run {
        return Ok(());
    }

    println!(
        "{} {}: {} installed, {} skipped, {} failed",
        style("Collection").green().bold(),
        args.collection,
        outcome.installed,
        outcome.skipped,
        outcome.failed
    );

    Ok(())
}

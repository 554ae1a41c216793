//! Install command implementation
//!
//! Wires the CLI arguments to the install engine:
//! 1. Resolve the project root
//! 2. Build the registry client
//! 3. Run the install sequence (resolve, fetch, extract, route, place, lock)
//! 4. Report the outcome

use std::path::PathBuf;

use console::style;

use crate::cli::InstallArgs;
use crate::error::Result;
use crate::installer::{InstallOptions, InstallOutcome, Installer};
use crate::package_ref::PackageRef;
use crate::registry::HttpRegistryClient;

/// Run the install command
pub fn run(project_root: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let root = super::resolve_project_root(project_root)?;
    let registry = HttpRegistryClient::new()?;
    let installer = Installer::new(&root, &registry);
    let id = PackageRef::parse(&args.package)?.id;

    let options = InstallOptions {
        target_format: args.target_format,
        frozen: args.frozen,
        dry_run: args.dry_run,
        ..InstallOptions::default()
    };

    match installer.install(&args.package, &options)? {
        InstallOutcome::Installed { version } => {
            println!(
                "{} {}@{}",
                style("Installed").green().bold(),
                id,
                version
            );
        }
        InstallOutcome::AlreadySatisfied { version } => {
            println!(
                "{}@{} is already installed, nothing to do",
                id, version
            );
        }
        InstallOutcome::DryRun { version } => {
            println!(
                "{} would install {}@{}",
                style("[dry run]").dim(),
                id,
                version
            );
        }
    }

    Ok(())
}

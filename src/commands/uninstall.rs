//! Uninstall command implementation

use std::path::PathBuf;

use console::style;

use crate::cli::UninstallArgs;
use crate::error::Result;
use crate::installer::Installer;
use crate::package_ref::PackageRef;
use crate::registry::HttpRegistryClient;

/// Run the uninstall command
pub fn run(project_root: Option<PathBuf>, args: UninstallArgs) -> Result<()> {
    let root = super::resolve_project_root(project_root)?;
    let registry = HttpRegistryClient::new()?;
    let installer = Installer::new(&root, &registry);
    let id = PackageRef::parse(&args.package)?.id;

    installer.uninstall(&args.package)?;
    println!("{} {}", style("Uninstalled").green().bold(), id);

    Ok(())
}

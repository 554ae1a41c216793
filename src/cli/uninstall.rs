use clap::Parser;

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
pub struct UninstallArgs {
    /// Package id: name or @scope/name
    pub package: String,
}

use clap::Parser;

use crate::router::Format;

/// Arguments for the install-collection command
#[derive(Parser, Debug)]
pub struct InstallCollectionArgs {
    /// Collection reference, e.g. @scope/collection-name
    pub collection: String,

    /// Convert members into another ecosystem's layout
    #[arg(long = "as", value_name = "FORMAT", value_enum)]
    pub target_format: Option<Format>,

    /// Fail on members with no lockfile entry
    #[arg(long)]
    pub frozen: bool,

    /// Enumerate the plan without installing anything
    #[arg(long)]
    pub dry_run: bool,
}

use clap::Parser;

use crate::router::Format;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install the latest version:\n    agentpm install @acme/review-rule\n\n\
                   Pin a version:\n    agentpm install @acme/review-rule@2.0.0\n\n\
                   Convert into another ecosystem's layout:\n    agentpm install @acme/review-rule --as claude\n\n\
                   Install with frozen lockfile:\n    agentpm install @acme/review-rule --frozen")]
pub struct InstallArgs {
    /// Package reference: name, name@version, @scope/name or @scope/name@version
    pub package: String,

    /// Convert into another ecosystem's layout (placement only; the lock
    /// entry keeps the package's native format)
    #[arg(long = "as", value_name = "FORMAT", value_enum)]
    pub target_format: Option<Format>,

    /// Fail if the lockfile has no entry for the package
    #[arg(long)]
    pub frozen: bool,

    /// Show what would be installed without actually installing
    #[arg(long)]
    pub dry_run: bool,
}

use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Show install paths alongside each package
    #[arg(long)]
    pub paths: bool,
}

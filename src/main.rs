//! agentpm - package manager for AI-assistant configuration artifacts
//!
//! Installs rules, agents, skills, slash commands and hooks from a registry
//! into the directory layout each ecosystem expects, recorded in a
//! per-project lockfile.

use clap::Parser;

use agentpm::cli::{Cli, Commands};
use agentpm::commands;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.project_root, args),
        Commands::Uninstall(args) => commands::uninstall::run(cli.project_root, args),
        Commands::InstallCollection(args) => commands::collection::run(cli.project_root, args),
        Commands::List(args) => commands::list::run(cli.project_root, args),
        Commands::Version => commands::version::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - install: Install command arguments
//! - uninstall: Uninstall command arguments
//! - collection: Collection install command arguments
//! - list: List command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod collection;
pub mod install;
pub mod list;
pub mod uninstall;

pub use collection::InstallCollectionArgs;
pub use install::InstallArgs;
pub use list::ListArgs;
pub use uninstall::UninstallArgs;

/// agentpm - package manager for AI-assistant configuration artifacts
///
/// Installs coding rules, agent definitions, skills and hooks into
/// tool-specific layouts, recorded in a per-project lockfile.
#[derive(Parser, Debug)]
#[command(
    name = "agentpm",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Package manager for AI-assistant configuration artifacts",
    long_about = "agentpm installs AI-assistant configuration packages (rules, agents, skills, \
                  slash commands, hooks) into the directory layout each ecosystem expects \
                  (Cursor, Claude Code, Windsurf, ...) and records them in agentpm.lock.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  agentpm install @acme/review-rule             \x1b[90m# Install latest\x1b[0m\n   \
                  agentpm install @acme/review-rule@2.0.0       \x1b[90m# Pin a version\x1b[0m\n   \
                  agentpm install @acme/review-rule --as claude \x1b[90m# Convert for Claude Code\x1b[0m\n   \
                  agentpm install-collection @acme/starter      \x1b[90m# Install a collection\x1b[0m\n   \
                  agentpm uninstall @acme/review-rule           \x1b[90m# Remove a package\x1b[0m\n   \
                  agentpm list                                  \x1b[90m# List installed packages\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "AGENTPM_PROJECT_ROOT")]
    pub project_root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a package from the registry
    Install(InstallArgs),

    /// Remove an installed package
    Uninstall(UninstallArgs),

    /// Install every member of a collection
    #[command(name = "install-collection")]
    InstallCollection(InstallCollectionArgs),

    /// List installed packages
    List(ListArgs),

    /// Show version information
    #[command(hide = true)]
    Version,
}

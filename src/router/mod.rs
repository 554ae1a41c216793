//! Destination routing: maps (format, subtype, package name) to the
//! ecosystem-owned location an artifact is written to.
//!
//! The table below is policy consumers depend on for idempotent re-runs:
//! install and uninstall must derive identical paths, so routing is a pure
//! function with no filesystem access. The one piece of outside knowledge it
//! needs, whether the shared root-level `AGENTS.md` is already taken by an
//! unrelated file, is passed in as a flag by the orchestrator.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{AgentPmError, Result};
use crate::package_ref::base_name;

/// Target AI-tool ecosystem a package is written for or converted into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Cursor (`.cursor/`), rules carry the `.mdc` extension
    Cursor,
    /// Claude Code (`.claude/`), the skill- and hook-hosting ecosystem
    Claude,
    /// Windsurf (`.windsurf/`), one shared rules directory
    Windsurf,
    /// Project-wide instructions (root-level `AGENTS.md`)
    Agents,
    /// Ecosystem-neutral pseudo-format; routes as the package's native format
    Canonical,
}

/// Artifact role within a format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Subtype {
    Rule,
    Agent,
    /// Slash command
    Command,
    Skill,
    /// Merged into the host settings document instead of written as a file
    Hook,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Format::Cursor => "cursor",
            Format::Claude => "claude",
            Format::Windsurf => "windsurf",
            Format::Agents => "agents",
            Format::Canonical => "canonical",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Subtype::Rule => "rule",
            Subtype::Agent => "agent",
            Subtype::Command => "command",
            Subtype::Skill => "skill",
            Subtype::Hook => "hook",
        };
        f.write_str(s)
    }
}

/// Fixed manifest filename inside a skill package directory
pub const SKILL_MANIFEST: &str = "SKILL.md";

/// Root-level filename for the project-instructions format
pub const AGENTS_FILE: &str = "AGENTS.md";

/// Host settings document for hook packages, relative to the project root
pub const SETTINGS_DOCUMENT: &str = ".claude/settings.json";

/// A routed destination, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    /// Directory the artifact lands in
    pub dir: PathBuf,
    /// Filename for single-file installs; `None` when the payload dictates
    /// its own file layout under `dir`
    pub filename: Option<String>,
}

impl Destination {
    fn new(dir: impl Into<PathBuf>, filename: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            filename,
        }
    }

    /// Full single-file path, when one is defined
    pub fn file_path(&self) -> Option<PathBuf> {
        self.filename.as_ref().map(|f| self.dir.join(f))
    }
}

/// Route a (format, subtype) pair to its destination.
///
/// `package_name` may be namespaced (`scope/name`); the namespace is always
/// stripped before path construction. `shared_agents_file_taken` signals that
/// the root-level `AGENTS.md` already exists and is not owned by this package,
/// forcing the per-package fallback form for the `agents` format.
pub fn route(
    format: Format,
    subtype: Subtype,
    package_name: &str,
    shared_agents_file_taken: bool,
) -> Result<Destination> {
    let name = base_name(package_name);
    let single = |dir: &str, ext: &str| Destination::new(dir, Some(format!("{name}.{ext}")));

    let dest = match (format, subtype) {
        (Format::Cursor, Subtype::Rule) => single(".cursor/rules", "mdc"),
        (Format::Cursor, Subtype::Command) => single(".cursor/commands", "md"),
        (Format::Cursor, Subtype::Agent) => single(".cursor/agents", "md"),

        (Format::Claude, Subtype::Rule) | (Format::Claude, Subtype::Agent) => {
            single(".claude/agents", "md")
        }
        (Format::Claude, Subtype::Command) => single(".claude/commands", "md"),
        (Format::Claude, Subtype::Skill) => Destination::new(
            PathBuf::from(".claude/skills").join(name),
            Some(SKILL_MANIFEST.to_string()),
        ),
        // Hooks are merged into the shared settings document, not written as
        // standalone files; the destination names the host document.
        (Format::Claude, Subtype::Hook) => {
            Destination::new(".claude", Some("settings.json".to_string()))
        }

        // Windsurf does not distinguish subtypes; everything shares rules/
        (Format::Windsurf, Subtype::Rule)
        | (Format::Windsurf, Subtype::Agent)
        | (Format::Windsurf, Subtype::Command)
        | (Format::Windsurf, Subtype::Skill) => single(".windsurf/rules", "md"),

        (Format::Agents, Subtype::Rule)
        | (Format::Agents, Subtype::Agent)
        | (Format::Agents, Subtype::Command) => {
            if shared_agents_file_taken {
                // Never clobber unrelated project-wide instructions
                Destination::new(
                    PathBuf::from(".agents").join(name),
                    Some(AGENTS_FILE.to_string()),
                )
            } else {
                Destination::new("", Some(AGENTS_FILE.to_string()))
            }
        }

        _ => {
            return Err(AgentPmError::UnknownFormat {
                format: format.to_string(),
                subtype: subtype.to_string(),
            });
        }
    };

    Ok(dest)
}

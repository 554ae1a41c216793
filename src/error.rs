//! Error types and handling for agentpm
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Fatal variants carry actionable help text; degraded conditions (archive
//! fallback, missing settings document at uninstall) are not errors and are
//! reported as informational output by the callers instead.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for agentpm operations
#[derive(Error, Diagnostic, Debug)]
pub enum AgentPmError {
    // Package reference errors
    #[error("Invalid package reference: {input}")]
    #[diagnostic(
        code(agentpm::reference::invalid),
        help("Valid forms: name, name@version, @scope/name, @scope/name@version")
    )]
    InvalidPackageRef { input: String },

    // Registry lookup errors
    #[error("Package '{id}' not found in registry")]
    #[diagnostic(
        code(agentpm::registry::package_not_found),
        help("Check the package name, e.g. via 'agentpm search {id}'")
    )]
    PackageNotFound { id: String },

    #[error("Version '{version}' of package '{id}' not found")]
    #[diagnostic(
        code(agentpm::registry::version_not_found),
        help("Run 'agentpm install {id}' without a version to get the latest release")
    )]
    VersionNotFound { id: String, version: String },

    #[error("Registry request failed: {url}: {reason}")]
    #[diagnostic(
        code(agentpm::registry::request_failed),
        help("Check your network connection and the AGENTPM_REGISTRY setting")
    )]
    RegistryRequestFailed { url: String, reason: String },

    #[error("Collection '{reference}' not found in registry")]
    #[diagnostic(
        code(agentpm::registry::collection_not_found),
        help("Collection references look like @scope/collection-name")
    )]
    CollectionNotFound { reference: String },

    // Resolution errors
    #[error("No lockfile entry for '{id}' in frozen mode")]
    #[diagnostic(
        code(agentpm::resolve::lockfile_entry_missing),
        help("Run 'agentpm install {id}' without --frozen to create the entry")
    )]
    LockfileEntryMissing { id: String },

    // Routing errors
    #[error("Unknown format/subtype combination: {format}/{subtype}")]
    #[diagnostic(
        code(agentpm::route::unknown_format),
        help(
            "The client and registry disagree on the supported format table; upgrade agentpm to the latest release"
        )
    )]
    UnknownFormat { format: String, subtype: String },

    // Package content errors
    #[error("Skill package '{id}' is malformed: {reason}")]
    #[diagnostic(
        code(agentpm::install::malformed_skill),
        help("Skill packages must contain a SKILL.md manifest; contact the package publisher")
    )]
    MalformedSkillPackage { id: String, reason: String },

    #[error("Hook payload of '{id}' is invalid: {reason}")]
    #[diagnostic(
        code(agentpm::install::hook_fragment_invalid),
        help("Hook packages must ship a JSON document with a top-level \"hooks\" object")
    )]
    HookFragmentInvalid { id: String, reason: String },

    // Uninstall errors
    #[error("Package '{id}' is not installed")]
    #[diagnostic(
        code(agentpm::uninstall::not_installed),
        help("Run 'agentpm list' to see installed packages")
    )]
    PackageNotInstalled { id: String },

    #[error("Lock entry for '{id}' records no install path")]
    #[diagnostic(
        code(agentpm::uninstall::path_unknown),
        help(
            "The entry was written by an older, incompatible client; remove the installed files manually, then delete the entry from agentpm.lock"
        )
    )]
    UninstallPathUnknown { id: String },

    // Collection errors
    #[error("Required collection member '{member}' of '{collection}' failed: {reason}")]
    #[diagnostic(
        code(agentpm::collection::required_member_failed),
        help(
            "Members installed before the failure keep their lock entries; fix the member and re-run the collection install"
        )
    )]
    RequiredCollectionMemberFailed {
        collection: String,
        member: String,
        reason: String,
    },

    // Persistence errors
    #[error("Failed to parse {path}: {reason}")]
    #[diagnostic(code(agentpm::fs::parse_failed))]
    ParseFailed { path: String, reason: String },

    #[error("Failed to read file: {path}")]
    #[diagnostic(code(agentpm::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(agentpm::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(agentpm::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for AgentPmError {
    fn from(err: std::io::Error) -> Self {
        AgentPmError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AgentPmError {
    fn from(err: serde_json::Error) -> Self {
        AgentPmError::ParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, AgentPmError>;

//! Version resolution policy.
//!
//! The precedence encodes "explicit beats implicit, implicit beats remembered,
//! remembered beats newest": it is what makes repeated installs reproducible
//! without requiring the caller to always pin a version.

use crate::error::{AgentPmError, Result};

/// Sentinel resolved by the registry to a concrete version
pub const LATEST: &str = "latest";

/// Inputs to version resolution for one package
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveRequest<'a> {
    pub package_id: &'a str,
    /// Version named directly by the caller (CLI `pkg@version`)
    pub explicit_version: Option<&'a str>,
    /// Version from a parsed spec (e.g. a collection plan entry)
    pub spec_version: Option<&'a str>,
    /// Version pinned in the lockfile
    pub locked_version: Option<&'a str>,
    /// Frozen mode: only the lockfile may answer
    pub frozen: bool,
}

/// Pick the version string to fetch.
///
/// Frozen mode short-circuits to requiring a locked version; otherwise the
/// first defined of explicit, spec, locked wins, falling back to the
/// [`LATEST`] sentinel for the registry to concretize.
pub fn resolve_version(req: &ResolveRequest<'_>) -> Result<String> {
    if req.frozen {
        return req
            .locked_version
            .map(str::to_string)
            .ok_or_else(|| AgentPmError::LockfileEntryMissing {
                id: req.package_id.to_string(),
            });
    }

    Ok(req
        .explicit_version
        .or(req.spec_version)
        .or(req.locked_version)
        .unwrap_or(LATEST)
        .to_string())
}

/// Whether a locked version satisfies a resolved version string.
///
/// The [`LATEST`] sentinel never satisfies from the lockfile alone; it must
/// first be concretized by the registry.
pub fn version_satisfied(resolved: &str, locked_version: Option<&str>) -> bool {
    resolved != LATEST && locked_version == Some(resolved)
}

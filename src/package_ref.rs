//! Package reference parsing
//!
//! Accepted forms: `name`, `name@version`, `@scope/name`, `@scope/name@version`.
//! Package ids are normalized without the leading `@`, so the lockfile key for
//! `@acme/review-rule` is `acme/review-rule`.

use crate::error::{AgentPmError, Result};

/// A parsed package reference: normalized id plus an optional explicit version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    /// Normalized package id (`name` or `scope/name`, no leading `@`)
    pub id: String,
    /// Explicit version requested in the reference, if any
    pub version: Option<String>,
}

impl PackageRef {
    /// Parse a package reference string
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid(input));
        }

        let (id, version) = if let Some(scoped) = trimmed.strip_prefix('@') {
            // Scoped: the first '@' is part of the scope marker, a second one
            // separates the version.
            match scoped.split_once('@') {
                Some((id, version)) => (id.to_string(), Some(version.to_string())),
                None => (scoped.to_string(), None),
            }
        } else {
            match trimmed.split_once('@') {
                Some((id, version)) => (id.to_string(), Some(version.to_string())),
                None => (trimmed.to_string(), None),
            }
        };

        validate_id(&id).map_err(|_| invalid(input))?;
        if let Some(v) = &version {
            if v.is_empty() {
                return Err(invalid(input));
            }
        }

        Ok(Self { id, version })
    }
}

/// Strip the namespace prefix from a package id: `scope/name` becomes `name`.
///
/// Every destination path is built from the stripped name; forgetting this is
/// the most common source of wrong install paths, so it lives in one place.
pub fn base_name(id: &str) -> &str {
    id.rsplit('/').next().unwrap_or(id)
}

fn validate_id(id: &str) -> std::result::Result<(), ()> {
    if id.is_empty() {
        return Err(());
    }
    let mut parts = id.split('/');
    let first = parts.next().ok_or(())?;
    let second = parts.next();
    if parts.next().is_some() {
        // At most one '/' (scope/name)
        return Err(());
    }
    if first.is_empty() || second.is_some_and(str::is_empty) {
        return Err(());
    }
    if id.contains(char::is_whitespace) || id.contains('@') || id.contains('\\') {
        return Err(());
    }
    Ok(())
}

fn invalid(input: &str) -> AgentPmError {
    AgentPmError::InvalidPackageRef {
        input: input.to_string(),
    }
}

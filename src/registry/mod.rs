//! Registry collaborator boundary.
//!
//! The engine consumes the registry through [`RegistryClient`] and treats
//! every fetch as either fully successful or failed; retries, backoff and
//! auth belong to the implementation behind the trait, not here. Tests drive
//! the engine with an in-memory implementation.

pub mod http;

use serde::Deserialize;

use crate::error::Result;
use crate::router::{Format, Subtype};

pub use http::HttpRegistryClient;

/// Package-level metadata as declared by its publisher
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    /// Native classification; recorded in the lockfile regardless of any
    /// conversion target
    pub native_format: Format,
    pub native_subtype: Subtype,
    pub latest_version: String,
}

/// Version-level metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionMetadata {
    pub download_url: String,
}

/// One member of a collection's ordered plan
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPlanEntry {
    pub package_id: String,
    pub version: String,
    /// Declared identity within the plan, used for display; installation
    /// re-reads the authoritative classification from package metadata
    pub format: Format,
    pub subtype: Subtype,
    pub required: bool,
}

/// A named, ordered, flat list of member package references.
///
/// Members are installed strictly in list order; order carries intent, e.g. a
/// base rule before a hook that references it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionManifest {
    pub scope: String,
    pub name_slug: String,
    pub version: String,
    pub packages: Vec<CollectionPlanEntry>,
}

/// The network collaborator the engine consumes.
pub trait RegistryClient {
    fn package_metadata(&self, id: &str) -> Result<PackageMetadata>;

    fn version_metadata(&self, id: &str, version: &str) -> Result<VersionMetadata>;

    /// Fetch raw artifact bytes. `target_format` instructs the remote side to
    /// convert before returning; the returned bytes are opaque input to
    /// extraction either way.
    fn download(&self, url: &str, target_format: Option<Format>) -> Result<Vec<u8>>;

    /// Fire-and-forget usage accounting; callers ignore failures.
    fn record_download(&self, id: &str, version: &str, format: Format) -> Result<()>;

    fn collection(&self, reference: &str) -> Result<CollectionManifest>;
}

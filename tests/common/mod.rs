//! Common test utilities: an in-memory registry and tar.gz payload builders.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;

use agentpm::error::{AgentPmError, Result};
use agentpm::registry::{
    CollectionManifest, CollectionPlanEntry, PackageMetadata, RegistryClient, VersionMetadata,
};
use agentpm::router::{Format, Subtype};

/// A temporary project root for driving the engine
#[allow(dead_code)]
pub struct TestProject {
    pub temp: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestProject {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }
}

/// Gzip a payload the way the registry serves artifacts
#[allow(dead_code)]
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("gzip write failed");
    encoder.finish().expect("gzip finish failed")
}

/// Build a tar container with the given entries
#[allow(dead_code)]
pub fn tarball(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, content) in entries {
        let mut header = tar::Header::new_ustar();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, *content)
            .expect("tar append failed");
    }
    builder.into_inner().expect("tar finish failed")
}

/// A gzipped tar container, the common artifact shape
#[allow(dead_code)]
pub fn archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    gzip(&tarball(entries))
}

#[allow(dead_code)]
struct MockPackage {
    native_format: Format,
    native_subtype: Subtype,
    latest_version: String,
    versions: HashMap<String, Vec<u8>>,
}

/// In-memory registry: packages and collections registered up front, download
/// traffic counted so tests can assert on no-op paths.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockRegistry {
    packages: HashMap<String, MockPackage>,
    collections: HashMap<String, CollectionManifest>,
    pub downloads: RefCell<usize>,
    pub last_download_format: RefCell<Option<Format>>,
}

#[allow(dead_code)]
impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package; the last version listed becomes `latestVersion`.
    pub fn add_package(
        &mut self,
        id: &str,
        format: Format,
        subtype: Subtype,
        versions: &[(&str, Vec<u8>)],
    ) {
        let latest_version = versions
            .last()
            .map(|(v, _)| (*v).to_string())
            .expect("a package needs at least one version");
        self.packages.insert(
            id.to_string(),
            MockPackage {
                native_format: format,
                native_subtype: subtype,
                latest_version,
                versions: versions
                    .iter()
                    .map(|(v, payload)| ((*v).to_string(), payload.clone()))
                    .collect(),
            },
        );
    }

    pub fn add_collection(
        &mut self,
        scope: &str,
        name_slug: &str,
        version: &str,
        packages: Vec<CollectionPlanEntry>,
    ) {
        self.collections.insert(
            format!("{scope}/{name_slug}"),
            CollectionManifest {
                scope: scope.to_string(),
                name_slug: name_slug.to_string(),
                version: version.to_string(),
                packages,
            },
        );
    }

    pub fn download_count(&self) -> usize {
        *self.downloads.borrow()
    }
}

/// Plan entry helper for collection tests
#[allow(dead_code)]
pub fn plan_entry(
    package_id: &str,
    version: &str,
    format: Format,
    subtype: Subtype,
    required: bool,
) -> CollectionPlanEntry {
    CollectionPlanEntry {
        package_id: package_id.to_string(),
        version: version.to_string(),
        format,
        subtype,
        required,
    }
}

impl RegistryClient for MockRegistry {
    fn package_metadata(&self, id: &str) -> Result<PackageMetadata> {
        let package = self
            .packages
            .get(id)
            .ok_or_else(|| AgentPmError::PackageNotFound { id: id.to_string() })?;
        Ok(PackageMetadata {
            native_format: package.native_format,
            native_subtype: package.native_subtype,
            latest_version: package.latest_version.clone(),
        })
    }

    fn version_metadata(&self, id: &str, version: &str) -> Result<VersionMetadata> {
        let package = self
            .packages
            .get(id)
            .ok_or_else(|| AgentPmError::PackageNotFound { id: id.to_string() })?;
        if !package.versions.contains_key(version) {
            return Err(AgentPmError::VersionNotFound {
                id: id.to_string(),
                version: version.to_string(),
            });
        }
        Ok(VersionMetadata {
            download_url: format!("mock://{id}/{version}"),
        })
    }

    fn download(&self, url: &str, target_format: Option<Format>) -> Result<Vec<u8>> {
        *self.downloads.borrow_mut() += 1;
        *self.last_download_format.borrow_mut() = target_format;

        let not_found = || AgentPmError::RegistryRequestFailed {
            url: url.to_string(),
            reason: "unknown artifact".to_string(),
        };
        let rest = url.strip_prefix("mock://").ok_or_else(not_found)?;
        let (id, version) = rest.rsplit_once('/').ok_or_else(not_found)?;
        self.packages
            .get(id)
            .and_then(|p| p.versions.get(version))
            .cloned()
            .ok_or_else(not_found)
    }

    fn record_download(&self, _id: &str, _version: &str, _format: Format) -> Result<()> {
        Ok(())
    }

    fn collection(&self, reference: &str) -> Result<CollectionManifest> {
        self.collections
            .get(reference.trim_start_matches('@'))
            .cloned()
            .ok_or_else(|| AgentPmError::CollectionNotFound {
                reference: reference.to_string(),
            })
    }
}

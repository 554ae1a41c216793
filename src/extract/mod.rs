//! Archive extraction with graceful degradation.
//!
//! Downloaded payloads are gzip-compressed and usually wrap a tar container,
//! but older artifacts in the wild are bare single files. Extraction therefore
//! never hard-fails on format ambiguity: the detection step produces an
//! explicit two-variant result and every parse failure degrades to the
//! single-file variant.

use std::io::Read;
use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::package_ref::base_name;
use crate::temp;

/// One logical file produced by extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    /// Path relative to the extraction root; never escapes it
    pub relative_path: PathBuf,
    pub content: Vec<u8>,
}

/// Detection result: a real archive container or a bare payload
#[derive(Debug)]
pub enum Extraction {
    /// Tar container with its installable file entries
    Container(Vec<ExtractedFile>),
    /// Bare payload treated as one file (also the fallback for every
    /// container-parse failure)
    SingleFile(Vec<u8>),
}

/// Offset of the `ustar` magic within a tar header block
const TAR_MAGIC_OFFSET: usize = 257;
const TAR_MAGIC: &[u8] = b"ustar";

/// Decompress and sniff a downloaded payload.
///
/// The outer gzip layer is optional; a payload that is not gzip is used as-is.
/// A decompressed payload is treated as a tar container only when the
/// fixed-offset magic matches; anything else, and any container that fails to
/// parse or yields zero installable files, becomes `SingleFile`.
pub fn sniff(bytes: &[u8]) -> Extraction {
    let payload = gunzip(bytes).unwrap_or_else(|| bytes.to_vec());

    if !looks_like_tar(&payload) {
        return Extraction::SingleFile(payload);
    }

    match unpack_container(&payload) {
        Ok(files) if !files.is_empty() => Extraction::Container(files),
        // Parse failure or nothing left after metadata exclusion
        _ => Extraction::SingleFile(payload),
    }
}

/// Extract a payload into installable files.
///
/// The single-file fallback names its one file after the package id
/// (namespace stripped). Returns the files together with a flag telling the
/// caller whether extraction degraded to single-file mode.
pub fn extract(bytes: &[u8], package_id: &str) -> (Vec<ExtractedFile>, bool) {
    match sniff(bytes) {
        Extraction::Container(files) => (files, false),
        Extraction::SingleFile(content) => {
            let file = ExtractedFile {
                relative_path: PathBuf::from(format!("{}.md", base_name(package_id))),
                content,
            };
            (vec![file], true)
        }
    }
}

fn gunzip(bytes: &[u8]) -> Option<Vec<u8>> {
    let mut decoder = GzDecoder::new(bytes);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).ok()?;
    Some(out)
}

fn looks_like_tar(payload: &[u8]) -> bool {
    payload.len() > TAR_MAGIC_OFFSET + TAR_MAGIC.len()
        && &payload[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + TAR_MAGIC.len()] == TAR_MAGIC
}

/// Unpack to a scratch directory and collect regular files.
///
/// The scratch directory is a `TempDir` rooted outside the project, removed on
/// drop on every exit path. Leaking scratch directories across repeated
/// installs is a correctness bug, not just hygiene.
fn unpack_container(payload: &[u8]) -> std::io::Result<Vec<ExtractedFile>> {
    let scratch = TempDir::with_prefix_in("agentpm-scratch-", temp::scratch_base())?;

    let mut archive = tar::Archive::new(payload);
    archive.unpack(scratch.path())?;

    let mut files = Vec::new();
    let mut entries: Vec<_> = WalkDir::new(scratch.path())
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .collect();
    entries.sort_by_key(|e| e.path().to_path_buf());

    for entry in entries {
        let relative = entry
            .path()
            .strip_prefix(scratch.path())
            .unwrap_or(entry.path())
            .to_path_buf();
        if escapes_root(&relative) || is_metadata_entry(&relative) {
            continue;
        }
        let content = std::fs::read(entry.path())?;
        files.push(ExtractedFile {
            relative_path: relative,
            content,
        });
    }

    Ok(files)
}

fn escapes_root(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)))
}

/// Manifest, license, readme and changelog entries describe the package, they
/// are not installable content.
fn is_metadata_entry(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return true;
    };
    let lower = name.to_lowercase();
    lower == "package.json"
        || lower.starts_with("license")
        || lower.starts_with("readme")
        || lower.starts_with("changelog")
}

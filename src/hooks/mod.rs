//! Hook configuration merging into the shared host settings document.
//!
//! Hook packages do not install standalone files; their payload is a JSON
//! fragment merged into `.claude/settings.json`, which is edited by many
//! independently-installed packages over time. Every entry a package
//! contributes is tagged with a synthetic id `<packageId>@<version>`. The tag
//! is the only correlation key between a lock entry and document entries;
//! entries are never matched by content, since two packages may emit
//! identical hook bodies.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AgentPmError, Result};
use crate::lockfile::HookMetadata;
use crate::router::SETTINGS_DOCUMENT;

/// One entry in an event's hook list: the correlation tag plus the package's
/// hook body passed through untouched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookEntry {
    /// Synthetic id `<packageId>@<version>`
    pub id: String,
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

/// The host settings document. Only the `hooks` key is ours to manage;
/// unrelated host settings are carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSettings {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hooks: BTreeMap<String, Vec<HookEntry>>,
    #[serde(flatten)]
    pub rest: serde_json::Map<String, serde_json::Value>,
}

/// Hook package payload: `{ "hooks": { "<event>": [ <entry>, ... ] } }`
#[derive(Debug, Deserialize)]
struct HookFragment {
    #[serde(default)]
    hooks: BTreeMap<String, Vec<serde_json::Map<String, serde_json::Value>>>,
}

/// Synthetic hook id for a package at a version
pub fn hook_id(package_id: &str, version: &str) -> String {
    format!("{package_id}@{version}")
}

/// Settings document path for a project root
pub fn settings_path(project_root: &Path) -> PathBuf {
    project_root.join(SETTINGS_DOCUMENT)
}

/// Read the settings document; an absent document is an empty one, never an
/// error.
pub fn load(project_root: &Path) -> Result<HostSettings> {
    let path = settings_path(project_root);
    if !path.exists() {
        return Ok(HostSettings::default());
    }
    let content = std::fs::read_to_string(&path).map_err(|e| AgentPmError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| AgentPmError::ParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn save(project_root: &Path, settings: &HostSettings) -> Result<()> {
    let path = settings_path(project_root);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| AgentPmError::FileWriteFailed {
            path: parent.display().to_string(),
            reason: e.to_string(),
        })?;
    }
    let json =
        serde_json::to_string_pretty(settings).map_err(|e| AgentPmError::ParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    std::fs::write(&path, json + "\n").map_err(|e| AgentPmError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Merge a package's hook fragment into the host settings document.
///
/// Entries are appended per event in fragment order; merge is never a
/// replace, so entries from other packages stay untouched. Re-merging the
/// same hook id first drops its previous entries, keeping the operation
/// idempotent for a given (package, version).
///
/// On an upgrade, `previous` carries the metadata recorded for the version
/// being replaced; its entries are dropped in the same read-modify-write
/// that appends the new ones. The fragment is parsed and validated before
/// the document is touched, so a broken upgrade payload fails without
/// stripping the working entries.
pub fn merge(
    project_root: &Path,
    package_id: &str,
    version: &str,
    fragment_bytes: &[u8],
    previous: Option<&HookMetadata>,
) -> Result<HookMetadata> {
    let fragment: HookFragment =
        serde_json::from_slice(fragment_bytes).map_err(|e| AgentPmError::HookFragmentInvalid {
            id: package_id.to_string(),
            reason: e.to_string(),
        })?;
    if fragment.hooks.is_empty() {
        return Err(AgentPmError::HookFragmentInvalid {
            id: package_id.to_string(),
            reason: "fragment declares no hook events".to_string(),
        });
    }

    let tag = hook_id(package_id, version);
    let mut settings = load(project_root)?;
    if let Some(prev) = previous {
        remove_tagged(&mut settings, &prev.events, &prev.hook_id);
    }
    remove_tagged(&mut settings, &fragment.hooks.keys().cloned().collect::<Vec<_>>(), &tag);

    let mut events = Vec::new();
    for (event, bodies) in fragment.hooks {
        let entries = settings.hooks.entry(event.clone()).or_default();
        for body in bodies {
            entries.push(HookEntry {
                id: tag.clone(),
                body,
            });
        }
        events.push(event);
    }

    save(project_root, &settings)?;
    Ok(HookMetadata {
        events,
        hook_id: tag,
    })
}

/// Whether the document still carries any entry tagged with the recorded
/// hook id.
///
/// The document is the state, the lock entry only bookkeeping: a wiped or
/// hand-edited settings file means the package is no longer installed even
/// when its lock entry survived.
pub fn is_merged(project_root: &Path, metadata: &HookMetadata) -> Result<bool> {
    if !settings_path(project_root).exists() {
        return Ok(false);
    }
    let settings = load(project_root)?;
    Ok(metadata.events.iter().any(|event| {
        settings
            .hooks
            .get(event)
            .is_some_and(|entries| entries.iter().any(|e| e.id == metadata.hook_id))
    }))
}

/// Remove every entry carrying the package's recorded hook id from its
/// recorded events.
///
/// Returns `false` when the settings document is missing entirely; callers
/// treat that as a warning, not a failure, and uninstall of the lock entry
/// proceeds.
pub fn unmerge(project_root: &Path, metadata: &HookMetadata) -> Result<bool> {
    if !settings_path(project_root).exists() {
        return Ok(false);
    }
    let mut settings = load(project_root)?;
    remove_tagged(&mut settings, &metadata.events, &metadata.hook_id);
    save(project_root, &settings)?;
    Ok(true)
}

/// Drop entries tagged `tag` from the listed events; events whose arrays
/// empty out lose their key entirely, keeping the document minimal and
/// diff-friendly.
fn remove_tagged(settings: &mut HostSettings, events: &[String], tag: &str) {
    for event in events {
        if let Some(entries) = settings.hooks.get_mut(event) {
            entries.retain(|e| e.id != tag);
            if entries.is_empty() {
                settings.hooks.remove(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fragment(event: &str, command: &str) -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "hooks": { event: [ { "type": "command", "command": command } ] }
        }))
        .unwrap()
    }

    #[test]
    fn test_merge_into_absent_document() {
        let temp = TempDir::new().unwrap();
        let meta = merge(temp.path(), "acme/fmt-hook", "1.0.0", &fragment("PostToolUse", "fmt"), None)
            .unwrap();

        assert_eq!(meta.hook_id, "acme/fmt-hook@1.0.0");
        assert_eq!(meta.events, vec!["PostToolUse".to_string()]);

        let settings = load(temp.path()).unwrap();
        let entries = &settings.hooks["PostToolUse"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "acme/fmt-hook@1.0.0");
        assert_eq!(entries[0].body["command"], "fmt");
    }

    #[test]
    fn test_merge_unmerge_is_inverse_pair() {
        let temp = TempDir::new().unwrap();
        let meta =
            merge(temp.path(), "acme/fmt-hook", "1.0.0", &fragment("PostToolUse", "fmt"), None).unwrap();
        assert!(unmerge(temp.path(), &meta).unwrap());

        // No residual empty event arrays, no stray keys
        let settings = load(temp.path()).unwrap();
        assert_eq!(settings, HostSettings::default());
        let raw = std::fs::read_to_string(settings_path(temp.path())).unwrap();
        assert!(!raw.contains("PostToolUse"));
    }

    #[test]
    fn test_two_hooks_coexist_in_append_order() {
        let temp = TempDir::new().unwrap();
        let meta_a =
            merge(temp.path(), "acme/hook-a", "1.0.0", &fragment("PostToolUse", "a"), None).unwrap();
        let meta_b =
            merge(temp.path(), "acme/hook-b", "1.0.0", &fragment("PostToolUse", "b"), None).unwrap();

        let settings = load(temp.path()).unwrap();
        let entries = &settings.hooks["PostToolUse"];
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, meta_a.hook_id);
        assert_eq!(entries[1].id, meta_b.hook_id);

        // Each independently removable without disturbing the other
        assert!(unmerge(temp.path(), &meta_a).unwrap());
        let settings = load(temp.path()).unwrap();
        let entries = &settings.hooks["PostToolUse"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, meta_b.hook_id);
        assert_eq!(entries[0].body["command"], "b");
    }

    #[test]
    fn test_identical_bodies_correlate_by_tag_only() {
        let temp = TempDir::new().unwrap();
        let meta_a =
            merge(temp.path(), "acme/hook-a", "1.0.0", &fragment("PostToolUse", "same"), None).unwrap();
        let _meta_b =
            merge(temp.path(), "acme/hook-b", "1.0.0", &fragment("PostToolUse", "same"), None).unwrap();

        assert!(unmerge(temp.path(), &meta_a).unwrap());
        let settings = load(temp.path()).unwrap();
        let entries = &settings.hooks["PostToolUse"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "acme/hook-b@1.0.0");
    }

    #[test]
    fn test_remerge_same_version_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let frag = fragment("PostToolUse", "fmt");
        merge(temp.path(), "acme/fmt-hook", "1.0.0", &frag, None).unwrap();
        merge(temp.path(), "acme/fmt-hook", "1.0.0", &frag, None).unwrap();

        let settings = load(temp.path()).unwrap();
        assert_eq!(settings.hooks["PostToolUse"].len(), 1);
    }

    #[test]
    fn test_unmerge_missing_document_is_soft() {
        let temp = TempDir::new().unwrap();
        let meta = HookMetadata {
            events: vec!["PostToolUse".to_string()],
            hook_id: "acme/fmt-hook@1.0.0".to_string(),
        };
        assert!(!unmerge(temp.path(), &meta).unwrap());
    }

    #[test]
    fn test_unrelated_host_settings_preserved() {
        let temp = TempDir::new().unwrap();
        let path = settings_path(temp.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{ "model": "opus", "hooks": {} }"#).unwrap();

        let meta =
            merge(temp.path(), "acme/fmt-hook", "1.0.0", &fragment("PostToolUse", "fmt"), None).unwrap();
        assert!(unmerge(temp.path(), &meta).unwrap());

        let settings = load(temp.path()).unwrap();
        assert_eq!(settings.rest["model"], "opus");
    }

    #[test]
    fn test_invalid_fragment_rejected() {
        let temp = TempDir::new().unwrap();
        let err = merge(temp.path(), "acme/bad", "1.0.0", b"not json", None).unwrap_err();
        assert!(matches!(err, AgentPmError::HookFragmentInvalid { .. }));

        let err =
            merge(temp.path(), "acme/empty", "1.0.0", b"{\"hooks\":{}}", None).unwrap_err();
        assert!(matches!(err, AgentPmError::HookFragmentInvalid { .. }));
    }

    #[test]
    fn test_merge_with_previous_replaces_old_tag() {
        let temp = TempDir::new().unwrap();
        let meta_v1 =
            merge(temp.path(), "acme/fmt-hook", "1.0.0", &fragment("PostToolUse", "v1"), None)
                .unwrap();
        merge(
            temp.path(),
            "acme/fmt-hook",
            "2.0.0",
            &fragment("PostToolUse", "v2"),
            Some(&meta_v1),
        )
        .unwrap();

        let settings = load(temp.path()).unwrap();
        let entries = &settings.hooks["PostToolUse"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "acme/fmt-hook@2.0.0");
        assert_eq!(entries[0].body["command"], "v2");
    }

    #[test]
    fn test_invalid_fragment_leaves_document_untouched() {
        let temp = TempDir::new().unwrap();
        let meta_v1 =
            merge(temp.path(), "acme/fmt-hook", "1.0.0", &fragment("PostToolUse", "v1"), None)
                .unwrap();

        let err = merge(temp.path(), "acme/fmt-hook", "2.0.0", b"not json", Some(&meta_v1))
            .unwrap_err();
        assert!(matches!(err, AgentPmError::HookFragmentInvalid { .. }));

        // The working entries survive the rejected upgrade
        let settings = load(temp.path()).unwrap();
        let entries = &settings.hooks["PostToolUse"];
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "acme/fmt-hook@1.0.0");
    }

    #[test]
    fn test_is_merged_tracks_document_state() {
        let temp = TempDir::new().unwrap();
        let meta =
            merge(temp.path(), "acme/fmt-hook", "1.0.0", &fragment("PostToolUse", "fmt"), None)
                .unwrap();
        assert!(is_merged(temp.path(), &meta).unwrap());

        assert!(unmerge(temp.path(), &meta).unwrap());
        assert!(!is_merged(temp.path(), &meta).unwrap());
    }

    #[test]
    fn test_is_merged_false_for_missing_document() {
        let temp = TempDir::new().unwrap();
        let meta = HookMetadata {
            events: vec!["PostToolUse".to_string()],
            hook_id: "acme/fmt-hook@1.0.0".to_string(),
        };
        assert!(!is_merged(temp.path(), &meta).unwrap());
    }
}

//! Skill package manifest enforcement.
//!
//! A skill installs as its own directory with a fixed `SKILL.md` manifest at
//! the root. Packages missing the manifest get one heuristic chance: a single
//! unambiguous markdown candidate is renamed to `SKILL.md`; anything else is
//! fatal for that package only.

use std::path::{Path, PathBuf};

use crate::error::{AgentPmError, Result};
use crate::extract::ExtractedFile;
use crate::router::SKILL_MANIFEST;

/// Ensure the file set carries a root-level `SKILL.md`, renaming a single
/// unambiguous candidate when necessary.
pub fn ensure_manifest(package_id: &str, files: &mut [ExtractedFile]) -> Result<()> {
    if files
        .iter()
        .any(|f| f.relative_path == Path::new(SKILL_MANIFEST))
    {
        return Ok(());
    }

    let candidates: Vec<usize> = files
        .iter()
        .enumerate()
        .filter(|(_, f)| f.relative_path.extension().is_some_and(|e| e == "md"))
        .map(|(i, _)| i)
        .collect();

    match candidates.as_slice() {
        [index] => {
            files[*index].relative_path = PathBuf::from(SKILL_MANIFEST);
            Ok(())
        }
        [] => Err(AgentPmError::MalformedSkillPackage {
            id: package_id.to_string(),
            reason: "no SKILL.md manifest and no markdown candidate to promote".to_string(),
        }),
        _ => Err(AgentPmError::MalformedSkillPackage {
            id: package_id.to_string(),
            reason: format!(
                "no SKILL.md manifest and {} ambiguous markdown candidates",
                candidates.len()
            ),
        }),
    }
}

//! Bring one artifact in a project in line with the catalog

use crate::catalog::{ArtifactKind, ArtifactReference};
use agentcat_types::{CatalogError, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// What happened to one artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactAction {
    /// Copied from the catalog
    Deployed,
    /// Already present and left untouched
    Skipped,
}

/// Copy `reference` to `destination`
///
/// An existing destination is left alone unless `force` is set, in which
/// case it is removed and copied again.
pub fn reconcile(reference: &ArtifactReference, destination: &Path, force: bool) -> Result<ArtifactAction> {
    if fs::symlink_metadata(destination).is_ok() {
        if !force {
            debug!("{} {} already present, skipping", reference.kind.label(), reference.name);
            return Ok(ArtifactAction::Skipped);
        }
        remove_existing(destination)?;
    }

    match reference.kind {
        ArtifactKind::Agent => {
            if let Some(dir) = destination.parent() {
                fs::create_dir_all(dir).map_err(CatalogError::fs(dir))?;
            }
            fs::copy(&reference.source, destination).map_err(CatalogError::fs(&reference.source))?;
        }
        ArtifactKind::Skill => copy_dir(&reference.source, destination)?,
    }

    Ok(ArtifactAction::Deployed)
}

/// Recursively copy the directory `source` to `destination`
pub fn copy_dir(source: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination).map_err(CatalogError::fs(destination))?;

    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            CatalogError::Fs {
                path,
                source: e.into(),
            }
        })?;

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(CatalogError::fs(&target))?;
        } else {
            fs::copy(entry.path(), &target).map_err(CatalogError::fs(entry.path()))?;
        }
    }

    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(CatalogError::fs(path))?;
    if metadata.is_dir() {
        fs::remove_dir_all(path).map_err(CatalogError::fs(path))
    } else {
        fs::remove_file(path).map_err(CatalogError::fs(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_dir_nested() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        fs::create_dir_all(src.join("refs")).unwrap();
        fs::write(src.join("SKILL.md"), "skill").unwrap();
        fs::write(src.join("refs/notes.md"), "notes").unwrap();

        let dst = tmp.path().join("dst");
        copy_dir(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("SKILL.md")).unwrap(), "skill");
        assert_eq!(fs::read_to_string(dst.join("refs/notes.md")).unwrap(), "notes");
    }

    #[test]
    fn test_force_replaces_file_with_directory() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("skill");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("SKILL.md"), "v2").unwrap();

        let dst = tmp.path().join("installed");
        fs::write(&dst, "stray file").unwrap();

        let reference = ArtifactReference {
            kind: ArtifactKind::Skill,
            name: "skill".into(),
            source: src,
        };
        assert_eq!(reconcile(&reference, &dst, false).unwrap(), ArtifactAction::Skipped);
        assert_eq!(reconcile(&reference, &dst, true).unwrap(), ArtifactAction::Deployed);
        assert_eq!(fs::read_to_string(dst.join("SKILL.md")).unwrap(), "v2");
    }
}

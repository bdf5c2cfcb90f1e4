//! Full-repository mirrors refreshed from a shallow clone

use crate::command::run_captured;
use crate::error::{Result, SyncError};
use agentcat_deploy::copy_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Default deadline for `git clone`
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// Changes listed individually in the log before summarising
const LOGGED_CHANGES: usize = 10;

/// A repository mirrored into the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoMirror {
    /// `owner/name` on GitHub
    pub repo: String,
    /// Directory under the catalog root
    pub local_dir: String,
    /// Directories replaced wholesale on every sync
    #[serde(default)]
    pub dirs: Vec<String>,
    /// Top-level files copied on every sync
    #[serde(default)]
    pub files: Vec<String>,
    /// Clone URL, `https://github.com/<repo>.git` when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl RepoMirror {
    pub fn clone_url(&self) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}.git", self.repo))
    }
}

/// Mirrors refreshed by default
pub fn default_mirrors() -> Vec<RepoMirror> {
    vec![RepoMirror {
        repo: "affaan-m/everything-claude-code".to_string(),
        local_dir: agentcat_deploy::catalog::DEFAULT_MIRROR_DIR.to_string(),
        dirs: [
            "agents",
            "commands",
            "contexts",
            "examples",
            "hooks",
            "mcp-configs",
            "rules",
            "skills",
            "plugins",
        ]
        .iter()
        .map(|d| d.to_string())
        .collect(),
        files: vec!["README.md".to_string(), "CONTRIBUTING.md".to_string()],
        url: None,
    }]
}

/// Whether a mirror was refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorStatus {
    Synced,
    #[serde(rename = "error")]
    Failed,
}

/// Outcome of refreshing one mirror
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorResult {
    pub repo: String,
    pub status: MirrorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    pub changes: Vec<String>,
}

impl MirrorResult {
    fn failed(repo: &str) -> Self {
        Self {
            repo: repo.to_string(),
            status: MirrorStatus::Failed,
            commit: None,
            changes: Vec::new(),
        }
    }
}

/// Clone `mirror` into `work_dir` and copy its listed content into the catalog
///
/// Clone failures are reported through [`MirrorStatus::Failed`], never as an
/// error. The scratch clone is removed afterwards.
pub async fn mirror_repo(
    mirror: &RepoMirror,
    catalog_root: &Path,
    work_dir: &Path,
    timeout: Duration,
) -> MirrorResult {
    info!("Syncing {}...", mirror.repo);

    let checkout = work_dir.join(mirror.repo.replace('/', "-"));
    if checkout.exists() {
        if let Err(e) = fs::remove_dir_all(&checkout) {
            warn!("Failed to clear {:?}: {}", checkout, e);
            return MirrorResult::failed(&mirror.repo);
        }
    }
    if let Err(e) = fs::create_dir_all(work_dir) {
        warn!("Failed to create {:?}: {}", work_dir, e);
        return MirrorResult::failed(&mirror.repo);
    }

    let url = mirror.clone_url();
    let target = checkout.to_string_lossy().into_owned();
    if let Err(e) = run_captured("git", &["clone", "--depth", "1", &url, &target], None, timeout).await {
        warn!("Failed to clone {}: {}", mirror.repo, e);
        let _ = fs::remove_dir_all(&checkout);
        return MirrorResult::failed(&mirror.repo);
    }

    let commit = run_captured("git", &["rev-parse", "--short=7", "HEAD"], Some(&checkout), timeout)
        .await
        .map(|sha| sha.trim().to_string())
        .ok()
        .filter(|sha| !sha.is_empty());

    let result = match apply_checkout(&checkout, mirror, &catalog_root.join(&mirror.local_dir)) {
        Ok(changes) => {
            log_changes(&mirror.repo, commit.as_deref(), &changes);
            MirrorResult {
                repo: mirror.repo.clone(),
                status: MirrorStatus::Synced,
                commit,
                changes,
            }
        }
        Err(e) => {
            warn!("Failed to update mirror of {}: {}", mirror.repo, e);
            MirrorResult::failed(&mirror.repo)
        }
    };

    if let Err(e) = fs::remove_dir_all(&checkout) {
        warn!("Failed to remove scratch clone {:?}: {}", checkout, e);
    }
    result
}

/// Replace each listed directory of `local_dir` with the checkout's copy and
/// copy the listed files, returning what is new or changed
pub fn apply_checkout(checkout: &Path, mirror: &RepoMirror, local_dir: &Path) -> Result<Vec<String>> {
    fs::create_dir_all(local_dir).map_err(SyncError::fs(local_dir))?;
    let mut changes = Vec::new();

    for dir in &mirror.dirs {
        let src = checkout.join(dir);
        if !src.is_dir() {
            continue;
        }
        let dst = local_dir.join(dir);

        let before = relative_files(&dst);
        changes.extend(
            relative_files(&src)
                .difference(&before)
                .map(|file| format!("{dir}/{file}")),
        );

        if dst.exists() {
            fs::remove_dir_all(&dst).map_err(SyncError::fs(&dst))?;
        }
        copy_dir(&src, &dst)?;
    }

    for file in &mirror.files {
        let src = checkout.join(file);
        if !src.is_file() {
            continue;
        }
        let dst = local_dir.join(file);

        let incoming = fs::read(&src).map_err(SyncError::fs(&src))?;
        let changed = match fs::read(&dst) {
            Ok(existing) => existing != incoming,
            Err(_) => true,
        };
        if changed {
            changes.push(file.clone());
        }
        fs::write(&dst, incoming).map_err(SyncError::fs(&dst))?;
    }

    Ok(changes)
}

/// Files below `root` as `/`-separated relative paths
fn relative_files(root: &Path) -> BTreeSet<String> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path().strip_prefix(root).ok().map(|rel| {
                rel.components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect()
}

fn log_changes(repo: &str, commit: Option<&str>, changes: &[String]) {
    let commit = commit.unwrap_or("unknown");
    if changes.is_empty() {
        info!("{} ({}) - no changes", repo, commit);
        return;
    }

    info!("Synced {} ({}) - {} changes", repo, commit, changes.len());
    for change in changes.iter().take(LOGGED_CHANGES) {
        info!("  + {}", change);
    }
    if changes.len() > LOGGED_CHANGES {
        info!("  ... and {} more", changes.len() - LOGGED_CHANGES);
    }
}

/// Scratch directory for clones
pub fn default_work_dir() -> PathBuf {
    std::env::temp_dir().join("agentcat-sync")
}

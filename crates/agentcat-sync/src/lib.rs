//! agentcat Sync - Keep the local catalog in step with upstream repositories
//!
//! Two jobs: refresh full-repository mirrors from shallow clones, and list
//! skills published upstream that the catalog does not have yet. Both
//! degrade to "nothing found" when `git`, `gh` or the network is unavailable.

mod command;
pub mod error;
pub mod listing;
pub mod mirror;
pub mod skills;

pub use error::{Result, SyncError};
pub use listing::{parse_contents, GhCli, RemoteListing, DEFAULT_LISTING_TIMEOUT};
pub use mirror::{
    apply_checkout, default_mirrors, default_work_dir, mirror_repo, MirrorResult, MirrorStatus,
    RepoMirror, DEFAULT_CLONE_TIMEOUT,
};
pub use skills::{default_skill_sources, discover_new_skills, NewSkill, SkillSource};

use agentcat_types::timestamp::{self, serde_ts};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Report file written next to the catalog
pub const SYNC_REPORT_FILE: &str = "sync_report.json";

/// Everything one sync run found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncReport {
    #[serde(with = "serde_ts")]
    pub timestamp: NaiveDateTime,
    pub new_skills: Vec<NewSkill>,
    pub synced_repos: Vec<MirrorResult>,
}

impl SyncReport {
    /// New skills plus changed mirror files
    pub fn total_changes(&self) -> usize {
        self.new_skills.len() + self.synced_repos.iter().map(|r| r.changes.len()).sum::<usize>()
    }

    /// Write as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(SyncError::fs(path))
    }
}

/// One sync run against a catalog root
#[derive(Debug, Clone)]
pub struct CatalogSync {
    catalog_root: PathBuf,
    work_dir: PathBuf,
    mirrors: Vec<RepoMirror>,
    sources: Vec<SkillSource>,
    clone_timeout: Duration,
}

impl CatalogSync {
    pub fn new(catalog_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog_root: catalog_root.into(),
            work_dir: default_work_dir(),
            mirrors: default_mirrors(),
            sources: default_skill_sources(),
            clone_timeout: DEFAULT_CLONE_TIMEOUT,
        }
    }

    pub fn with_mirrors(mut self, mirrors: Vec<RepoMirror>) -> Self {
        self.mirrors = mirrors;
        self
    }

    pub fn with_sources(mut self, sources: Vec<SkillSource>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_clone_timeout(mut self, timeout: Duration) -> Self {
        self.clone_timeout = timeout;
        self
    }

    /// Default report location
    pub fn report_path(&self) -> PathBuf {
        self.catalog_root.join(SYNC_REPORT_FILE)
    }

    /// Refresh mirrors, then look for new skills
    pub async fn run<L>(&self, listing: Arc<L>) -> Result<SyncReport>
    where
        L: RemoteListing + 'static,
    {
        info!("Catalog sync started for {:?}", self.catalog_root);

        let mut synced_repos = Vec::with_capacity(self.mirrors.len());
        for mirror in &self.mirrors {
            synced_repos.push(mirror_repo(mirror, &self.catalog_root, &self.work_dir, self.clone_timeout).await);
        }

        let new_skills = discover_new_skills(&self.catalog_root, &self.sources, listing).await?;
        if new_skills.is_empty() {
            info!("No new skills found");
        } else {
            info!("Found {} new skills", new_skills.len());
            for skill in &new_skills {
                info!("  - {}/{} ({})", skill.source, skill.name, skill.url);
            }
        }

        Ok(SyncReport {
            timestamp: timestamp::now(),
            new_skills,
            synced_repos,
        })
    }
}

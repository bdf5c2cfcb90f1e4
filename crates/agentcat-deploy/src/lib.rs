//! agentcat Deploy - Reconcile a project's agents and skills with a profile
//!
//! A deploy copies every artifact the profile names from the catalog into
//! `<project>/.claude/`, regenerates the dispatcher, recomputes metrics from
//! the feedback log and rewrites `project-profile.yaml`.

#![deny(unsafe_code, unused_imports, unused_variables)]

pub mod catalog;
pub mod dispatcher;
pub mod reconcile;
pub mod state;

pub use catalog::{ArtifactCatalog, ArtifactKind, ArtifactReference};
pub use dispatcher::{render_dispatcher, title_case, AgentDescriptions, DISPATCHER_NAME};
pub use reconcile::{copy_dir, reconcile, ArtifactAction};
pub use state::{ProjectStateStore, STATE_FILE};

use agentcat_feedback::{aggregate, FeedbackStore};
use agentcat_profiles::ProfileRegistry;
use agentcat_types::{
    timestamp, CatalogError, Profile, ProjectMetrics, ProjectState, Result, CONFIG_DIR,
    DEFAULT_CATALOG_VERSION,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Days of feedback folded into the cached metrics
pub const METRICS_WINDOW_DAYS: u32 = 30;

/// Outcome of one artifact category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    pub deployed: Vec<String>,
    pub skipped: Vec<String>,
    pub missing: Vec<String>,
    /// Deployed or skipped, in profile order
    #[serde(skip)]
    present: Vec<String>,
}

impl CategoryReport {
    /// Artifacts now in the project
    pub fn present(&self) -> &[String] {
        &self.present
    }

    fn record(&mut self, name: &str, action: ArtifactAction) {
        match action {
            ArtifactAction::Deployed => self.deployed.push(name.to_string()),
            ArtifactAction::Skipped => self.skipped.push(name.to_string()),
        }
        self.present.push(name.to_string());
    }
}

/// Everything a deploy did
#[derive(Debug, Clone, Serialize)]
pub struct DeploymentResult {
    pub project_name: String,
    pub profile_name: String,
    pub agents: CategoryReport,
    pub skills: CategoryReport,
    pub warnings: Vec<String>,
    pub dispatcher: PathBuf,
    pub state: ProjectState,
}

/// Deploys profiles into projects
#[derive(Debug, Clone)]
pub struct Deployer {
    registry: ProfileRegistry,
    catalog: ArtifactCatalog,
    descriptions: AgentDescriptions,
    catalog_version: String,
}

impl Deployer {
    pub fn new(registry: ProfileRegistry, catalog: ArtifactCatalog) -> Self {
        Self {
            registry,
            catalog,
            descriptions: AgentDescriptions::default(),
            catalog_version: DEFAULT_CATALOG_VERSION.to_string(),
        }
    }

    pub fn with_descriptions(mut self, descriptions: AgentDescriptions) -> Self {
        self.descriptions = descriptions;
        self
    }

    pub fn with_catalog_version(mut self, version: impl Into<String>) -> Self {
        self.catalog_version = version.into();
        self
    }

    pub fn catalog(&self) -> &ArtifactCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Deploy the profile called `profile_name`
    pub fn deploy(&self, project_root: &Path, profile_name: &str, force: bool) -> Result<DeploymentResult> {
        self.deploy_at(project_root, profile_name, force, timestamp::now())
    }

    /// Like [`Deployer::deploy`] with an explicit clock
    pub fn deploy_at(
        &self,
        project_root: &Path,
        profile_name: &str,
        force: bool,
        now: NaiveDateTime,
    ) -> Result<DeploymentResult> {
        let root = resolve_project(project_root)?;
        let profile = self.registry.load_one(profile_name)?;
        self.deploy_resolved(&root, &profile, force, now)
    }

    /// Redeploy the recorded profile, overwriting every artifact
    pub fn sync(&self, project_root: &Path) -> Result<DeploymentResult> {
        let root = resolve_project(project_root)?;
        let recorded = self.recorded_state(&root)?;

        info!("Syncing {} with profile {}", root.display(), recorded.profile_name);
        let profile = self.registry.load_one(&recorded.profile_name)?;
        self.deploy_resolved(&root, &profile, true, timestamp::now())
    }

    /// Recompute the cached metrics of a deployed project
    pub fn refresh_metrics(&self, project_root: &Path) -> Result<ProjectState> {
        self.refresh_metrics_at(project_root, timestamp::now())
    }

    pub fn refresh_metrics_at(&self, project_root: &Path, now: NaiveDateTime) -> Result<ProjectState> {
        let root = resolve_project(project_root)?;
        let mut state = self.recorded_state(&root)?;

        state.metrics = project_metrics(&root, now)?;
        ProjectStateStore::for_project(&root).save(&state)?;

        info!(
            "Refreshed metrics for {}: {} tasks, {}% accepted",
            state.project_name, state.metrics.total_tasks, state.metrics.acceptance_rate
        );
        Ok(state)
    }

    fn recorded_state(&self, root: &Path) -> Result<ProjectState> {
        ProjectStateStore::for_project(root)
            .load()?
            .ok_or_else(|| CatalogError::NoProfileRecorded(root.to_path_buf()))
    }

    fn deploy_resolved(
        &self,
        root: &Path,
        profile: &Profile,
        force: bool,
        now: NaiveDateTime,
    ) -> Result<DeploymentResult> {
        let project_name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        info!("Deploying profile {} to {}", profile.name, project_name);

        let config_dir = root.join(CONFIG_DIR);
        let mut warnings = Vec::new();

        let agents = self.reconcile_category(
            &config_dir,
            ArtifactKind::Agent,
            &profile.all_agents(),
            force,
            &mut warnings,
        )?;
        let skills = self.reconcile_category(
            &config_dir,
            ArtifactKind::Skill,
            &profile.skills,
            force,
            &mut warnings,
        )?;

        let dispatcher = config_dir
            .join(ArtifactKind::Agent.project_dir())
            .join(ArtifactKind::Agent.entry_name(DISPATCHER_NAME));
        let document = render_dispatcher(&project_name, profile, agents.present(), &self.descriptions);
        if let Some(dir) = dispatcher.parent() {
            fs::create_dir_all(dir).map_err(CatalogError::fs(dir))?;
        }
        fs::write(&dispatcher, document).map_err(CatalogError::fs(&dispatcher))?;

        let store = ProjectStateStore::for_project(root);
        let created_at = match store.load() {
            Ok(Some(previous)) => previous.created_at,
            Ok(None) => now,
            Err(e) => {
                warn!("Replacing unreadable project state {:?}: {}", store.path(), e);
                now
            }
        };

        let state = ProjectState {
            project_name: project_name.clone(),
            profile_name: profile.name.clone(),
            created_at,
            last_sync_at: now,
            catalog_version: self.catalog_version.clone(),
            deployed_agents: agents.present().to_vec(),
            deployed_skills: skills.present().to_vec(),
            metrics: project_metrics(root, now)?,
        };
        store.save(&state)?;

        FeedbackStore::for_project(root).ensure_log()?;

        info!(
            "Deployed {} agents and {} skills to {} ({} skipped, {} missing)",
            agents.deployed.len(),
            skills.deployed.len(),
            project_name,
            agents.skipped.len() + skills.skipped.len(),
            agents.missing.len() + skills.missing.len()
        );

        Ok(DeploymentResult {
            project_name,
            profile_name: profile.name.clone(),
            agents,
            skills,
            warnings,
            dispatcher,
            state,
        })
    }

    fn reconcile_category(
        &self,
        config_dir: &Path,
        kind: ArtifactKind,
        names: &[String],
        force: bool,
        warnings: &mut Vec<String>,
    ) -> Result<CategoryReport> {
        let target_dir = config_dir.join(kind.project_dir());
        fs::create_dir_all(&target_dir).map_err(CatalogError::fs(&target_dir))?;

        let mut report = CategoryReport::default();
        let mut seen = HashSet::new();

        for name in names {
            if !seen.insert(name.as_str()) {
                continue;
            }
            if kind == ArtifactKind::Agent && name == DISPATCHER_NAME {
                warn!("{} is generated for every project, not copied", DISPATCHER_NAME);
                continue;
            }

            let Some(reference) = self.catalog.resolve(kind, name) else {
                let message = format!("{} not found: {}", kind.label(), name);
                warn!("{}", message);
                warnings.push(message);
                report.missing.push(name.clone());
                continue;
            };

            let destination = target_dir.join(kind.entry_name(name));
            let action = reconcile(&reference, &destination, force)?;
            report.record(name, action);
        }

        Ok(report)
    }
}

/// Metrics block over the last [`METRICS_WINDOW_DAYS`] days
fn project_metrics(root: &Path, now: NaiveDateTime) -> Result<ProjectMetrics> {
    let events = FeedbackStore::for_project(root).load_since(now, METRICS_WINDOW_DAYS)?;
    Ok(aggregate(events).rollup(now))
}

fn resolve_project(project_root: &Path) -> Result<PathBuf> {
    match project_root.canonicalize() {
        Ok(root) if root.is_dir() => Ok(root),
        _ => Err(CatalogError::ProjectNotFound(project_root.to_path_buf())),
    }
}

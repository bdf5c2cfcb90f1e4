use crate::cli::{Command, DeployArgs, FeedbackArgs, ReportArgs};
use crate::config::Config;
use crate::output;
use agentcat_deploy::{ArtifactCatalog, Deployer};
use agentcat_feedback::{aggregate, FeedbackStore};
use agentcat_profiler::{Profiler, ScoringPolicy};
use agentcat_profiles::ProfileRegistry;
use agentcat_report::{render, render_all, render_summary, ProjectReport};
use agentcat_sync::{CatalogSync, GhCli};
use agentcat_types::{timestamp, FeedbackEvent};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Catalog service - runs one command against the configured catalog
pub struct CatalogService {
    config: Config,
}

impl CatalogService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(self, command: Command) -> Result<()> {
        agentcat_logging::init_logging(&self.config.logging.level)?;

        let catalog_root = self.config.catalog_root()?;
        debug!("Catalog root: {}", catalog_root.display());

        match command {
            Command::Analyze { project, json } => self.analyze(&catalog_root, &project, json),
            Command::Deploy(args) => self.deploy(&catalog_root, args),
            Command::Sync { project } => self.sync(&catalog_root, &project),
            Command::List => self.list(&catalog_root),
            Command::Feedback(args) => self.feedback(args),
            Command::Summary { project, days } => self.summary(&project, days),
            Command::RefreshMetrics { project } => self.refresh_metrics(&catalog_root, &project),
            Command::Report(args) => self.report(args),
            Command::CheckUpdates => self.check_updates(&catalog_root).await,
        }
    }

    fn registry(&self, catalog_root: &Path) -> ProfileRegistry {
        ProfileRegistry::for_catalog(catalog_root)
    }

    fn profiler(&self, catalog_root: &Path) -> Result<Profiler> {
        let policy = match self.config.policy_file()? {
            Some(path) => ScoringPolicy::load(&path)
                .with_context(|| format!("Failed to load scoring policy {}", path.display()))?,
            None => ScoringPolicy::default(),
        };
        Ok(Profiler::new(self.registry(catalog_root), policy))
    }

    fn deployer(&self, catalog_root: &Path) -> Deployer {
        let catalog = ArtifactCatalog::new(catalog_root)
            .with_skill_sources(self.config.catalog.skill_sources.clone())
            .with_mirror_dir(self.config.catalog.mirror_dir.clone());

        Deployer::new(self.registry(catalog_root), catalog)
            .with_catalog_version(self.config.catalog.catalog_version.clone())
            .with_descriptions(self.config.agent_descriptions())
    }

    fn days(&self, days: Option<u32>) -> u32 {
        days.unwrap_or(self.config.reports.default_days)
    }

    fn analyze(&self, catalog_root: &Path, project: &Path, json: bool) -> Result<()> {
        let recommendation = self.profiler(catalog_root)?.recommend(project)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&recommendation)?);
        } else {
            println!("{}", output::recommendation(&recommendation));
        }
        Ok(())
    }

    fn deploy(&self, catalog_root: &Path, args: DeployArgs) -> Result<()> {
        let profile = match (args.profile, args.auto) {
            (Some(profile), _) => profile,
            (None, true) => {
                let recommendation = self.profiler(catalog_root)?.recommend(&args.project)?;
                match recommendation.primary_profile {
                    Some(profile) => {
                        println!(
                            "Auto-detected profile: {} ({}% match)",
                            profile, recommendation.confidence
                        );
                        profile
                    }
                    None => bail!(
                        "No matching profile for {}. Deploy with --profile <name>.",
                        args.project.display()
                    ),
                }
            }
            (None, false) => bail!("Either --profile or --auto is required"),
        };

        let result = self
            .deployer(catalog_root)
            .deploy(&args.project, &profile, args.force)?;
        println!("{}", output::deployment(&result, &args.project));
        Ok(())
    }

    fn sync(&self, catalog_root: &Path, project: &Path) -> Result<()> {
        let result = self.deployer(catalog_root).sync(project)?;
        println!("Synced {} with profile: {}", result.project_name, result.profile_name);
        println!("{}", output::deployment(&result, project));
        Ok(())
    }

    fn list(&self, catalog_root: &Path) -> Result<()> {
        let profiles = self.registry(catalog_root).load_all()?;
        let agents = ArtifactCatalog::new(catalog_root).list_agents();
        println!("{}", output::listing(&profiles, &agents));
        Ok(())
    }

    fn feedback(&self, args: FeedbackArgs) -> Result<()> {
        let mut event = FeedbackEvent::new(&args.agent, &args.task, args.outcome)
            .with_iterations(args.iterations);
        if let Some(reason) = args.reason {
            event = event.with_reason(reason);
        }
        if let Some(tokens) = args.tokens {
            event = event.with_tokens(tokens);
        }

        let root = resolve(&args.project)?;
        FeedbackStore::for_project(&root).append(&event)?;

        let task: String = args.task.chars().take(50).collect();
        println!("Logged: {} | {} | {}", args.agent, args.outcome, task);
        Ok(())
    }

    fn summary(&self, project: &Path, days: Option<u32>) -> Result<()> {
        let days = self.days(days);
        let root = resolve(project)?;
        let stats = aggregate(FeedbackStore::for_project(&root).load(days)?);

        println!(
            "{}",
            render_summary(&project_name(&root), &root.display().to_string(), days, &stats)
        );
        Ok(())
    }

    fn refresh_metrics(&self, catalog_root: &Path, project: &Path) -> Result<()> {
        let state = self.deployer(catalog_root).refresh_metrics(project)?;
        println!(
            "Updated project profile metrics: {} tasks, {}% accepted",
            state.metrics.total_tasks, state.metrics.acceptance_rate
        );
        Ok(())
    }

    fn report(&self, args: ReportArgs) -> Result<()> {
        let days = self.days(args.days);
        let now = timestamp::now();

        let rendered = if args.all {
            let root = self.config.projects_root()?;
            info!("Reporting on tracked projects under {}", root.display());
            render_all(&root, days, args.format, now)?
        } else {
            let Some(project) = args.project else {
                bail!("Give a project path or --all");
            };
            let report = ProjectReport::build(&resolve(&project)?, days, now)?;
            render(&report, args.format)?
        };

        match args.output {
            Some(path) => {
                fs::write(&path, rendered)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                println!("Report saved to: {}", path.display());
            }
            None => println!("{rendered}"),
        }
        Ok(())
    }

    async fn check_updates(&self, catalog_root: &Path) -> Result<()> {
        let sync_config = &self.config.sync;
        let mut sync = CatalogSync::new(catalog_root)
            .with_sources(sync_config.skill_sources.clone())
            .with_mirrors(sync_config.mirrors.clone())
            .with_clone_timeout(Duration::from_secs(sync_config.clone_timeout_secs));
        if let Some(work_dir) = self.config.sync_work_dir()? {
            sync = sync.with_work_dir(work_dir);
        }

        let listing = Arc::new(GhCli::new(Duration::from_secs(sync_config.timeout_secs)));
        let report = sync.run(listing).await?;

        for repo in &report.synced_repos {
            println!("{}: {:?}, {} changes", repo.repo, repo.status, repo.changes.len());
        }
        if report.new_skills.is_empty() {
            println!("No new skills found");
        } else {
            println!("Found {} new skills:", report.new_skills.len());
            for skill in &report.new_skills {
                println!("  - {}/{}", skill.source, skill.name);
                println!("    URL: {}", skill.url);
            }
        }

        let report_path = sync.report_path();
        report.save(&report_path)?;
        println!("Report saved to: {}", report_path.display());
        Ok(())
    }
}

fn resolve(project: &Path) -> Result<PathBuf> {
    project
        .canonicalize()
        .with_context(|| format!("Project path does not exist: {}", project.display()))
}

fn project_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}

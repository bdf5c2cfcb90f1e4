//! agentcat Profiler
//!
//! Analyzes a project, scores every registered profile against it and
//! recommends the agents and skills of the best match.
//!
//! ## Scoring
//!
//! - 20 points per indicator shared by project and profile
//! - 15 points per profile indicator that is also a literal dependency
//! - One policy-defined bonus per profile name
//! - Clamped to 100; two profiles can both reach it

pub mod analyzer;
pub mod matcher;
pub mod policy;

pub use analyzer::ProjectAnalyzer;
pub use matcher::ProfileMatcher;
pub use policy::{BonusRule, ScoringPolicy};

use agentcat_profiles::ProfileRegistry;
use agentcat_types::{CatalogError, Profile, ProfileMatch, ProjectAnalysis, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Analysis, ranked matches and the deployment set of the top match
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub project: String,
    pub name: String,
    pub analysis: ProjectAnalysis,
    pub profile_matches: Vec<ProfileMatch>,
    /// `None` when no profile scored above zero
    pub primary_profile: Option<String>,
    pub confidence: u32,
    pub recommended_agents: Vec<String>,
    pub recommended_skills: Vec<String>,
}

impl Recommendation {
    /// Pick the top match out of already ranked `matches`
    pub fn build(
        analysis: ProjectAnalysis,
        matches: Vec<ProfileMatch>,
        profiles: &BTreeMap<String, Profile>,
    ) -> Self {
        let top = matches.first();
        let top_profile = top.and_then(|m| profiles.get(&m.profile_name));

        Self {
            project: analysis.path.clone(),
            name: analysis.project_name.clone(),
            primary_profile: top.map(|m| m.profile_name.clone()),
            confidence: top.map_or(0, |m| m.score),
            recommended_agents: top_profile.map(Profile::all_agents).unwrap_or_default(),
            recommended_skills: top_profile.map(|p| p.skills.clone()).unwrap_or_default(),
            profile_matches: matches,
            analysis,
        }
    }
}

/// Registry, analyzer and matcher wired together
#[derive(Debug, Clone)]
pub struct Profiler {
    registry: ProfileRegistry,
    analyzer: ProjectAnalyzer,
    matcher: ProfileMatcher,
}

impl Profiler {
    pub fn new(registry: ProfileRegistry, policy: ScoringPolicy) -> Self {
        Self {
            registry,
            analyzer: ProjectAnalyzer::default(),
            matcher: ProfileMatcher::new(policy),
        }
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Analyze `project_root` and rank all registered profiles against it
    pub fn recommend(&self, project_root: &Path) -> Result<Recommendation> {
        let root = project_root
            .canonicalize()
            .map_err(|_| CatalogError::ProjectNotFound(project_root.to_path_buf()))?;
        if !root.is_dir() {
            return Err(CatalogError::ProjectNotFound(root));
        }

        let profiles = self.registry.load_all()?;
        let analysis = self.analyzer.analyze(&root);
        let matches = self.matcher.match_profiles(&analysis, profiles.values());

        let recommendation = Recommendation::build(analysis, matches, &profiles);
        match &recommendation.primary_profile {
            Some(profile) => info!(
                "Recommended profile for {}: {} ({}%)",
                recommendation.name, profile, recommendation.confidence
            ),
            None => info!("No matching profile for {}", recommendation.name),
        }

        Ok(recommendation)
    }
}

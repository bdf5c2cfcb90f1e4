//! Discovery of skills published upstream but absent from the catalog

use crate::error::Result;
use crate::listing::RemoteListing;
use agentcat_deploy::catalog::SKILLS_DIR;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// An upstream skills repository and the catalog directory it maps to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSource {
    /// `owner/name` on GitHub
    pub repo: String,
    /// Directory inside the repository holding one folder per skill
    pub path: String,
    /// Directory under `<catalog>/skills/`
    pub local_name: String,
}

impl SkillSource {
    pub fn new(repo: impl Into<String>, path: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            repo: repo.into(),
            path: path.into(),
            local_name: local_name.into(),
        }
    }
}

/// Upstream sources checked by default
pub fn default_skill_sources() -> Vec<SkillSource> {
    vec![
        SkillSource::new("anthropics/skills", "skills", "anthropic"),
        SkillSource::new("vercel-labs/agent-skills", "skills", "vercel"),
    ]
}

/// A remote skill with no local copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSkill {
    pub source: String,
    pub name: String,
    pub repo: String,
    pub url: String,
}

/// Remote skills missing from `<catalog_root>/skills/<local_name>/`
///
/// Sources are queried concurrently; results keep source order.
pub async fn discover_new_skills<L>(
    catalog_root: &Path,
    sources: &[SkillSource],
    listing: Arc<L>,
) -> Result<Vec<NewSkill>>
where
    L: RemoteListing + 'static,
{
    let name_re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$")?;

    let mut tasks = JoinSet::new();
    for (index, source) in sources.iter().enumerate() {
        let source = source.clone();
        let listing = Arc::clone(&listing);
        tasks.spawn(async move {
            info!("Checking {} for new skills...", source.repo);
            let names = listing.list_subdirectories(&source.repo, &source.path).await;
            (index, names)
        });
    }

    let mut listed: Vec<(usize, Vec<String>)> = Vec::with_capacity(sources.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(result) => listed.push(result),
            Err(e) => warn!("Skill listing task failed: {}", e),
        }
    }
    listed.sort_by_key(|(index, _)| *index);

    let mut found = Vec::new();
    for (index, names) in listed {
        let source = &sources[index];
        let local_dir = catalog_root.join(SKILLS_DIR).join(&source.local_name);

        for name in names {
            if !name_re.is_match(&name) {
                warn!("Ignoring remote skill with unusable name {:?} in {}", name, source.repo);
                continue;
            }
            if local_dir.join(&name).is_dir() {
                continue;
            }
            found.push(NewSkill {
                source: source.local_name.clone(),
                url: format!("https://github.com/{}/tree/main/{}/{}", source.repo, source.path, name),
                repo: source.repo.clone(),
                name,
            });
        }
    }

    Ok(found)
}

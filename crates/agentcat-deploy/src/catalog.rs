//! Artifact lookup in the local catalog
//!
//! Agents are single Markdown documents, skills are whole directories.
//! Curated locations are searched before the mirrored repository; the first
//! hit wins.

use agentcat_types::is_plain_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Curated agents root: `agents/<category>/<name>.md`
pub const AGENTS_DIR: &str = "agents";
/// Curated skills root: `skills/<source>/<name>/`
pub const SKILLS_DIR: &str = "skills";
/// Mirrored repository searched after the curated locations
pub const DEFAULT_MIRROR_DIR: &str = "everything-claude-code";
/// Skill sources in search order
pub const DEFAULT_SKILL_SOURCES: [&str; 2] = ["vercel", "anthropic"];

/// What kind of artifact a name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Agent,
    Skill,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Agent => "Agent",
            ArtifactKind::Skill => "Skill",
        }
    }

    /// Directory under the project config root holding this kind
    pub fn project_dir(&self) -> &'static str {
        match self {
            ArtifactKind::Agent => AGENTS_DIR,
            ArtifactKind::Skill => SKILLS_DIR,
        }
    }

    /// Entry name of an artifact inside its directory
    pub fn entry_name(&self, name: &str) -> String {
        match self {
            ArtifactKind::Agent => format!("{name}.md"),
            ArtifactKind::Skill => name.to_string(),
        }
    }
}

/// A named artifact resolved to its catalog location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactReference {
    pub kind: ArtifactKind,
    pub name: String,
    pub source: PathBuf,
}

/// The local catalog tree
#[derive(Debug, Clone)]
pub struct ArtifactCatalog {
    root: PathBuf,
    skill_sources: Vec<String>,
    mirror_dir: String,
}

impl ArtifactCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            skill_sources: DEFAULT_SKILL_SOURCES.iter().map(|s| s.to_string()).collect(),
            mirror_dir: DEFAULT_MIRROR_DIR.to_string(),
        }
    }

    pub fn with_skill_sources(mut self, sources: Vec<String>) -> Self {
        self.skill_sources = sources;
        self
    }

    pub fn with_mirror_dir(mut self, mirror_dir: impl Into<String>) -> Self {
        self.mirror_dir = mirror_dir.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `name`, or `None` when no location has it
    pub fn resolve(&self, kind: ArtifactKind, name: &str) -> Option<ArtifactReference> {
        if !is_plain_name(name) {
            warn!("Refusing {} name with path components: {:?}", kind.label(), name);
            return None;
        }

        let source = match kind {
            ArtifactKind::Agent => self.find_agent(name),
            ArtifactKind::Skill => self.find_skill(name),
        }?;

        debug!("Resolved {} {} -> {:?}", kind.label(), name, source);
        Some(ArtifactReference {
            kind,
            name: name.to_string(),
            source,
        })
    }

    /// Agent document: curated categories first, then the mirror
    pub fn find_agent(&self, name: &str) -> Option<PathBuf> {
        let file = format!("{name}.md");

        self.agent_categories()
            .into_iter()
            .map(|category| category.join(&file))
            .chain(std::iter::once(
                self.root.join(&self.mirror_dir).join(AGENTS_DIR).join(&file),
            ))
            .find(|candidate| candidate.is_file())
    }

    /// Skill directory: configured sources in order, then the mirror
    pub fn find_skill(&self, name: &str) -> Option<PathBuf> {
        self.skill_sources
            .iter()
            .map(|source| self.root.join(SKILLS_DIR).join(source).join(name))
            .chain(std::iter::once(
                self.root.join(&self.mirror_dir).join(SKILLS_DIR).join(name),
            ))
            .find(|candidate| candidate.is_dir())
    }

    /// Curated agents grouped by category, both sorted
    pub fn list_agents(&self) -> BTreeMap<String, Vec<String>> {
        let mut listing = BTreeMap::new();

        for category in self.agent_categories() {
            let Ok(entries) = fs::read_dir(&category) else {
                continue;
            };
            let mut agents: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && p.extension().is_some_and(|e| e == "md"))
                .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .collect();
            if agents.is_empty() {
                continue;
            }
            agents.sort();

            let name = category
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            listing.insert(name, agents);
        }

        listing
    }

    /// Category directories under `agents/`, sorted
    fn agent_categories(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.root.join(AGENTS_DIR)) else {
            return Vec::new();
        };

        let mut categories: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_dir())
            .collect();
        categories.sort();
        categories
    }
}

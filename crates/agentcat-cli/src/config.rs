use agentcat_deploy::AgentDescriptions;
use agentcat_sync::{default_mirrors, default_skill_sources, RepoMirror, SkillSource};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[catalog]
root = ""  # Set via AGENTCAT_CATALOG_DIR env var; empty means ~/.agentcat/catalog
mirror_dir = "everything-claude-code"
skill_sources = ["vercel", "anthropic"]
catalog_version = "1.0"

# Extra dispatcher selection hints, merged over the stock table:
# [catalog.agent_descriptions]
# rust-pro = "Rust crates, ownership, async runtimes"

[profiler]
policy_file = ""  # Optional YAML scoring policy

[reports]
projects_root = ""  # Set via AGENTCAT_PROJECTS_DIR env var; empty means the home directory
default_days = 7

[sync]
timeout_secs = 30
clone_timeout_secs = 120
work_dir = ""  # Empty means the system temp directory

[[sync.skill_sources]]
repo = "anthropics/skills"
path = "skills"
local_name = "anthropic"

[[sync.skill_sources]]
repo = "vercel-labs/agent-skills"
path = "skills"
local_name = "vercel"

[[sync.mirrors]]
repo = "affaan-m/everything-claude-code"
local_dir = "everything-claude-code"
dirs = ["agents", "commands", "contexts", "examples", "hooks", "mcp-configs", "rules", "skills", "plugins"]
files = ["README.md", "CONTRIBUTING.md"]

[logging]
level = "info"  # trace, debug, info, warn, error
"#;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub root: String,
    pub mirror_dir: String,
    pub skill_sources: Vec<String>,
    pub catalog_version: String,
    /// Agent name -> dispatcher selection hint
    pub agent_descriptions: BTreeMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            mirror_dir: agentcat_deploy::catalog::DEFAULT_MIRROR_DIR.to_string(),
            skill_sources: agentcat_deploy::catalog::DEFAULT_SKILL_SOURCES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            catalog_version: agentcat_types::DEFAULT_CATALOG_VERSION.to_string(),
            agent_descriptions: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ProfilerConfig {
    pub policy_file: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportsConfig {
    pub projects_root: String,
    pub default_days: u32,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            projects_root: String::new(),
            default_days: 7,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SyncConfig {
    pub timeout_secs: u64,
    pub clone_timeout_secs: u64,
    pub work_dir: String,
    pub skill_sources: Vec<SkillSource>,
    pub mirrors: Vec<RepoMirror>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            clone_timeout_secs: 120,
            work_dir: String::new(),
            skill_sources: default_skill_sources(),
            mirrors: default_mirrors(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub profiler: ProfilerConfig,
    pub reports: ReportsConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

impl Config {
    fn home_dir() -> anyhow::Result<PathBuf> {
        dirs::home_dir().context("Could not find home directory")
    }

    /// Get the global config path: ~/.agentcat/agentcat.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::home_dir()?.join(".agentcat").join("agentcat.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)
                    .with_context(|| format!("Failed to create {}", config_dir.display()))?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.agentcat/agentcat.toml (auto-created if missing)
    /// 2. Local override: ./agentcat.toml (optional)
    /// 3. Environment variables with the AGENTCAT__ prefix
    /// 4. AGENTCAT_CATALOG_DIR / AGENTCAT_PROJECTS_DIR (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file from current directory
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let mut config_builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("agentcat").required(false))
            .add_source(config::Environment::with_prefix("AGENTCAT").separator("__"));

        if let Ok(dir) = env::var("AGENTCAT_CATALOG_DIR") {
            config_builder = config_builder.set_override("catalog.root", dir)?;
        }

        if let Ok(dir) = env::var("AGENTCAT_PROJECTS_DIR") {
            config_builder = config_builder.set_override("reports.projects_root", dir)?;
        }

        let config: Self = config_builder
            .build()?
            .try_deserialize()
            .context("Invalid agentcat configuration")?;
        Ok(config)
    }

    /// Stock dispatcher hints with the configured ones layered on top
    pub fn agent_descriptions(&self) -> AgentDescriptions {
        self.catalog
            .agent_descriptions
            .iter()
            .fold(AgentDescriptions::default(), |acc, (agent, desc)| {
                acc.with(agent.as_str(), desc.as_str())
            })
    }

    /// Catalog root, `~/.agentcat/catalog` when unset
    pub fn catalog_root(&self) -> anyhow::Result<PathBuf> {
        match non_empty(&self.catalog.root) {
            Some(root) => expand_home(root),
            None => Ok(Self::home_dir()?.join(".agentcat").join("catalog")),
        }
    }

    /// Directory whose children are scanned by `report --all`
    pub fn projects_root(&self) -> anyhow::Result<PathBuf> {
        match non_empty(&self.reports.projects_root) {
            Some(root) => expand_home(root),
            None => Self::home_dir(),
        }
    }

    pub fn policy_file(&self) -> anyhow::Result<Option<PathBuf>> {
        non_empty(&self.profiler.policy_file).map(expand_home).transpose()
    }

    pub fn sync_work_dir(&self) -> anyhow::Result<Option<PathBuf>> {
        non_empty(&self.sync.work_dir).map(expand_home).transpose()
    }
}

fn non_empty(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// Expand a leading `~/`
fn expand_home(path: &str) -> anyhow::Result<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => Ok(Config::home_dir()?.join(rest)),
        None => Ok(Path::new(path).to_path_buf()),
    }
}

//! Project analysis: manifests, a bounded source scan and layout checks
//!
//! Everything is recomputed from the filesystem on each call. Missing or
//! unparseable manifests and unreadable source files only shrink the
//! result; analysis itself never fails.

use agentcat_types::{ProjectAnalysis, ProjectStructure, StructureFlag};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Maximum number of source files read by the keyword scan
pub const MAX_SCANNED_FILES: usize = 50;

/// Source extensions reported in `file_types`
pub const WATCHED_EXTENSIONS: [&str; 5] = ["py", "ts", "tsx", "js", "jsx"];

/// Only Python sources are read by the keyword scan
pub const SCANNED_EXTENSION: &str = "py";

/// Directories never descended into
const SKIPPED_DIRS: [&str; 6] = [
    "node_modules",
    "venv",
    "__pycache__",
    "target",
    "dist",
    "build",
];

/// Substring in a package token -> extra indicator token
const DEPENDENCY_ALIASES: &[(&str, &str)] = &[
    ("clob", "polymarket"),
    ("polymarket", "polymarket"),
    ("kalshi", "kalshi"),
];

/// Names looked for anywhere in `pyproject.toml`
const PYPROJECT_VOCABULARY: &[&str] = &[
    "fastapi",
    "flask",
    "django",
    "sqlalchemy",
    "anthropic",
    "openai",
    "langchain",
    "pytest",
    "ccxt",
    "alpaca",
    "telethon",
    "streamlit",
    "polymarket",
    "kalshi",
    "binance",
    "trading",
];

/// Indicators derived from dependency tokens (exact or substring)
const INDICATOR_KEYWORDS: &[&str] = &[
    "anthropic",
    "openai",
    "langchain",
    "llm",
    "embedding",
    "ccxt",
    "alpaca",
    "trading",
    "arbitrage",
    "kalshi",
    "polymarket",
    "sqlalchemy",
    "prisma",
    "drizzle",
    "postgresql",
    "mongodb",
    "telethon",
    "telegram",
    "discord",
    "binance",
    "crypto",
];

/// Domain category -> keywords searched for in source files
const SOURCE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "polymarket",
        &["polymarket", "clob", "condition_id", "token_id"],
    ),
    ("kalshi", &["kalshi", "kalshi_", "trade-api"]),
    ("arbitrage", &["arbitrage", "edge", "kelly", "position_size"]),
    ("trading", &["buy_yes", "buy_no", "place_order", "execute_trade"]),
    ("crypto", &["private_key", "wallet", "polygon", "ethereum"]),
];

/// Dependency token -> framework display name
const FRAMEWORKS: &[(&str, &str)] = &[
    ("fastapi", "FastAPI"),
    ("flask", "Flask"),
    ("django", "Django"),
    ("next", "Next.js"),
    ("react", "React"),
    ("vue", "Vue"),
    ("express", "Express"),
    ("streamlit", "Streamlit"),
];

/// Relative paths checked per structure flag; any hit sets the flag
const STRUCTURE_PATHS: &[(StructureFlag, &[&str])] = &[
    (StructureFlag::Api, &["src/api", "app/api", "pages/api", "api"]),
    (StructureFlag::Tests, &["tests", "test", "__tests__"]),
    (
        StructureFlag::Docker,
        &["Dockerfile", "docker-compose.yml", "docker-compose.yaml"],
    ),
    (
        StructureFlag::Db,
        &["src/db", "migrations", "alembic", "prisma"],
    ),
    (
        StructureFlag::Frontend,
        &["src/components", "components", "app"],
    ),
];

const PYTHON_MANIFESTS: [&str; 3] = ["requirements.txt", "pyproject.toml", "setup.py"];

/// Analyzes a project directory
#[derive(Debug, Clone)]
pub struct ProjectAnalyzer {
    max_scanned_files: usize,
}

impl Default for ProjectAnalyzer {
    fn default() -> Self {
        Self {
            max_scanned_files: MAX_SCANNED_FILES,
        }
    }
}

impl ProjectAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the source scan cap
    pub fn with_max_scanned_files(mut self, max: usize) -> Self {
        self.max_scanned_files = max;
        self
    }

    /// Analyze the project rooted at `root`
    pub fn analyze(&self, root: &Path) -> ProjectAnalysis {
        let dependencies = read_dependencies(root);

        let mut analysis = ProjectAnalysis {
            project_name: root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: root.display().to_string(),
            ..Default::default()
        };

        if PYTHON_MANIFESTS.iter().any(|m| root.join(m).exists()) {
            analysis.tech_stack.insert("Python".to_string());
        }
        if root.join("package.json").exists() {
            analysis.tech_stack.insert("Node.js".to_string());
            if dependencies.contains("typescript") {
                analysis.tech_stack.insert("TypeScript".to_string());
            }
        }

        for (dep, framework) in FRAMEWORKS {
            if dependencies.contains(*dep) {
                analysis.frameworks.insert((*framework).to_string());
            }
        }

        for keyword in INDICATOR_KEYWORDS {
            if dependencies.iter().any(|d| d.contains(keyword)) {
                analysis.indicators.insert((*keyword).to_string());
            }
        }
        analysis
            .indicators
            .extend(self.scan_source_indicators(root));

        analysis.structure = analyze_structure(root);
        analysis.dependencies = dependencies;

        debug!(
            "Analyzed {:?}: {} dependencies, {} indicators",
            root,
            analysis.dependencies.len(),
            analysis.indicators.len()
        );
        analysis
    }

    /// Domain categories whose keywords appear in the first N Python files
    fn scan_source_indicators(&self, root: &Path) -> BTreeSet<String> {
        let mut indicators = BTreeSet::new();

        let scanned = source_files(root)
            .filter(|p| watched_extension(p) == Some(SCANNED_EXTENSION))
            .take(self.max_scanned_files);
        for path in scanned {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content.to_lowercase(),
                Err(e) => {
                    debug!("Skipping {:?}: {}", path, e);
                    continue;
                }
            };

            for (category, keywords) in SOURCE_KEYWORDS {
                if keywords.iter().any(|kw| content.contains(kw)) {
                    indicators.insert((*category).to_string());
                }
            }
        }

        indicators
    }
}

/// Normalized dependency tokens from all supported manifests
fn read_dependencies(root: &Path) -> BTreeSet<String> {
    let mut deps = BTreeSet::new();

    if let Ok(content) = fs::read_to_string(root.join("requirements.txt")) {
        for line in content.to_lowercase().lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(pkg) = normalize_requirement(line) {
                expand_aliases(&pkg, &mut deps);
                deps.insert(pkg);
            }
        }
    }

    if let Ok(content) = fs::read_to_string(root.join("pyproject.toml")) {
        let content = content.to_lowercase();
        for pkg in PYPROJECT_VOCABULARY {
            if content.contains(pkg) {
                deps.insert((*pkg).to_string());
            }
        }
    }

    let package_json = root.join("package.json");
    if let Ok(content) = fs::read_to_string(&package_json) {
        match serde_json::from_str::<Value>(&content) {
            Ok(manifest) => {
                for section in ["dependencies", "devDependencies"] {
                    if let Some(entries) = manifest.get(section).and_then(Value::as_object) {
                        deps.extend(entries.keys().map(|k| k.to_lowercase()));
                    }
                }
            }
            Err(e) => warn!("Ignoring unparseable {:?}: {}", package_json, e),
        }
    }

    deps
}

/// Package name of one requirements line: version constraints and extras stripped
pub fn normalize_requirement(line: &str) -> Option<String> {
    let mut name = line;
    for marker in ["==", ">=", "<=", "["] {
        if let Some((head, _)) = name.split_once(marker) {
            name = head;
        }
    }
    let name = name.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

fn expand_aliases(pkg: &str, deps: &mut BTreeSet<String>) {
    for (needle, alias) in DEPENDENCY_ALIASES {
        if pkg.contains(needle) {
            deps.insert((*alias).to_string());
        }
    }
}

fn analyze_structure(root: &Path) -> ProjectStructure {
    let mut structure = ProjectStructure::default();

    for (flag, paths) in STRUCTURE_PATHS {
        let present = paths.iter().any(|p| root.join(p).exists());
        structure.set(*flag, present);
    }

    for path in source_files(root) {
        if let Some(ext) = watched_extension(&path) {
            structure.file_types.insert(ext.to_string());
            if structure.file_types.len() == WATCHED_EXTENSIONS.len() {
                break;
            }
        }
    }

    structure
}

/// Files with a watched extension, in a stable order
fn source_files(root: &Path) -> impl Iterator<Item = PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(DirEntry::into_path)
        .filter(|p| watched_extension(p).is_some())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

fn watched_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?;
    WATCHED_EXTENSIONS.iter().copied().find(|w| *w == ext)
}

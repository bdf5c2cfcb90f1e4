//! Project analysis and profile match results

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Signals extracted from a project tree. Recomputed on every call, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectAnalysis {
    pub project_name: String,
    pub path: String,
    /// Coarse platform tags (`Python`, `Node.js`, `TypeScript`)
    pub tech_stack: BTreeSet<String>,
    /// Display names of detected frameworks (`FastAPI`, `Next.js`, ...)
    pub frameworks: BTreeSet<String>,
    /// Normalized, case-folded package tokens
    pub dependencies: BTreeSet<String>,
    /// Domain tokens from dependencies and the source scan
    pub indicators: BTreeSet<String>,
    pub structure: ProjectStructure,
}

/// Layout flags of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectStructure {
    pub has_api: bool,
    pub has_tests: bool,
    pub has_docker: bool,
    pub has_db: bool,
    pub has_frontend: bool,
    /// Watched extensions with at least one file present
    pub file_types: BTreeSet<String>,
}

/// Addressable structure flag, used by scoring rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureFlag {
    Api,
    Tests,
    Docker,
    Db,
    Frontend,
}

impl ProjectStructure {
    pub fn has(&self, flag: StructureFlag) -> bool {
        match flag {
            StructureFlag::Api => self.has_api,
            StructureFlag::Tests => self.has_tests,
            StructureFlag::Docker => self.has_docker,
            StructureFlag::Db => self.has_db,
            StructureFlag::Frontend => self.has_frontend,
        }
    }

    pub fn set(&mut self, flag: StructureFlag, value: bool) {
        let slot = match flag {
            StructureFlag::Api => &mut self.has_api,
            StructureFlag::Tests => &mut self.has_tests,
            StructureFlag::Docker => &mut self.has_docker,
            StructureFlag::Db => &mut self.has_db,
            StructureFlag::Frontend => &mut self.has_frontend,
        };
        *slot = value;
    }
}

/// Score of one profile against one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMatch {
    #[serde(rename = "profile")]
    pub profile_name: String,
    /// Saturating score in `[0, 100]`
    pub score: u32,
    pub reasons: Vec<String>,
}

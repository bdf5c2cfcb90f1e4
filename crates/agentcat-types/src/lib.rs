//! agentcat Types - Core types shared by the catalog crates
//!
//! Profiles, project analysis results, the persisted project-state record,
//! feedback log events and the error taxonomy.

pub mod analysis;
pub mod error;
pub mod feedback;
pub mod profile;
pub mod state;
pub mod timestamp;

pub use analysis::{ProfileMatch, ProjectAnalysis, ProjectStructure, StructureFlag};
pub use error::{CatalogError, Result};
pub use feedback::{FeedbackEvent, Outcome};
pub use profile::{AgentSet, Profile, TechPatterns};
pub use state::{ProjectMetrics, ProjectState, DEFAULT_CATALOG_VERSION};

/// Hidden configuration root inside a target project
pub const CONFIG_DIR: &str = ".claude";

/// A single path component, safe to join onto a catalog or project path
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names() {
        assert!(is_plain_name("python-pro"));
        assert!(is_plain_name("v1.2"));
        assert!(!is_plain_name("../etc"));
        assert!(!is_plain_name("a\\b"));
        assert!(!is_plain_name(".."));
        assert!(!is_plain_name(""));
    }
}

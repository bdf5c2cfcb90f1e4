//! Declarative profile definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named bundle of agents and skills suited to one class of project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech_patterns: TechPatterns,
    pub agents: AgentSet,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub rules: Vec<String>,
    /// Free text placed in the dispatcher document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_context: Option<String>,
}

/// Technology signals a profile cares about
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechPatterns {
    /// Manifest files that hint at the profile (informational)
    #[serde(default)]
    pub required_any: Vec<String>,
    #[serde(default)]
    pub indicators: Vec<String>,
}

/// Agents deployed by a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSet {
    pub core: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl Profile {
    /// Case-folded indicator tokens
    pub fn indicator_set(&self) -> BTreeSet<String> {
        self.tech_patterns
            .indicators
            .iter()
            .map(|i| i.trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect()
    }

    /// `agents.core` followed by `agents.optional`
    pub fn all_agents(&self) -> Vec<String> {
        self.agents
            .core
            .iter()
            .chain(self.agents.optional.iter())
            .cloned()
            .collect()
    }
}

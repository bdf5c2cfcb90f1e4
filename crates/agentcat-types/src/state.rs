//! Persisted per-project deployment record (`.claude/project-profile.yaml`)

use crate::timestamp::{serde_ts, serde_ts_opt};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Catalog version stamped into new records
pub const DEFAULT_CATALOG_VERSION: &str = "1.0";

/// Deployment record of one project. Always written as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    #[serde(rename = "project")]
    pub project_name: String,
    #[serde(rename = "profile")]
    pub profile_name: String,
    #[serde(rename = "created", with = "serde_ts")]
    pub created_at: NaiveDateTime,
    #[serde(rename = "last_sync", with = "serde_ts")]
    pub last_sync_at: NaiveDateTime,
    #[serde(default = "default_catalog_version")]
    pub catalog_version: String,
    #[serde(default)]
    pub deployed_agents: Vec<String>,
    #[serde(default)]
    pub deployed_skills: Vec<String>,
    #[serde(default)]
    pub metrics: ProjectMetrics,
}

fn default_catalog_version() -> String {
    DEFAULT_CATALOG_VERSION.to_string()
}

/// Cached feedback rollup, recomputed from the log on every write
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectMetrics {
    #[serde(default)]
    pub total_tasks: usize,
    #[serde(default)]
    pub accepted: usize,
    #[serde(default)]
    pub rejected: usize,
    #[serde(default)]
    pub acceptance_rate: f64,
    #[serde(default, with = "serde_ts_opt")]
    pub last_updated: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp;

    #[test]
    fn test_yaml_keys_and_order() {
        let ts = timestamp::parse("2026-10-18T09:30:00.000001").unwrap();
        let state = ProjectState {
            project_name: "shop".into(),
            profile_name: "python-backend".into(),
            created_at: ts,
            last_sync_at: ts,
            catalog_version: DEFAULT_CATALOG_VERSION.into(),
            deployed_agents: vec!["python-pro".into()],
            deployed_skills: vec![],
            metrics: ProjectMetrics::default(),
        };

        let yaml = serde_yaml::to_string(&state).unwrap();
        let keys: Vec<&str> = yaml
            .lines()
            .filter(|l| !l.starts_with(' ') && !l.starts_with('-'))
            .filter_map(|l| l.split(':').next())
            .collect();
        assert_eq!(
            keys,
            vec![
                "project",
                "profile",
                "created",
                "last_sync",
                "catalog_version",
                "deployed_agents",
                "deployed_skills",
                "metrics"
            ]
        );
        assert!(yaml.contains("2026-10-18T09:30:00.000001"));
    }

    #[test]
    fn test_legacy_record_loads() {
        let yaml = r#"
project: shop
profile: python-backend
created: '2026-01-02T03:04:05.000006'
last_sync: '2026-01-02T03:04:05.000006'
catalog_version: '1.0'
deployed_agents:
- python-pro
deployed_skills: []
metrics:
  total_tasks: 0
  accepted: 0
  rejected: 0
  iterations: 0
"#;
        let state: ProjectState = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(state.profile_name, "python-backend");
        assert_eq!(state.metrics.acceptance_rate, 0.0);
        assert!(state.metrics.last_updated.is_none());
    }
}

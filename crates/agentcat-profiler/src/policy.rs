//! Scoring policy: point values and per-profile bonus rules
//!
//! Bonus rules are data keyed by profile name, so adding a profile with its
//! own bonus means editing a policy file, not the matcher.

use agentcat_types::{CatalogError, ProjectAnalysis, Result, StructureFlag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// One bonus rule, applied to the profile it is keyed under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BonusRule {
    /// Flat bonus when a framework was detected
    Framework {
        framework: String,
        points: u32,
        reason: String,
    },
    /// Bonus for a platform, larger when one of its web frameworks is present
    Platform {
        platform: String,
        frameworks: Vec<String>,
        framework_points: u32,
        framework_reason: String,
        platform_points: u32,
        platform_reason: String,
    },
    /// Bonus for every matched domain indicator
    PerIndicator {
        indicators: BTreeSet<String>,
        points: u32,
        label: String,
    },
    /// Flat bonus when any of the indicators is present
    AnyIndicator {
        indicators: BTreeSet<String>,
        points: u32,
        reason: String,
    },
    /// Flat bonus when a framework and a structure flag are both present
    FrameworkWithStructure {
        framework: String,
        flag: StructureFlag,
        points: u32,
        reason: String,
    },
}

impl BonusRule {
    /// Points and reason when the rule fires
    pub fn apply(&self, analysis: &ProjectAnalysis) -> Option<(u32, String)> {
        match self {
            BonusRule::Framework {
                framework,
                points,
                reason,
            } => analysis
                .frameworks
                .contains(framework)
                .then(|| (*points, reason.clone())),
            BonusRule::Platform {
                platform,
                frameworks,
                framework_points,
                framework_reason,
                platform_points,
                platform_reason,
            } => {
                if !analysis.tech_stack.contains(platform) {
                    return None;
                }
                if frameworks.iter().any(|f| analysis.frameworks.contains(f)) {
                    Some((*framework_points, framework_reason.clone()))
                } else {
                    Some((*platform_points, platform_reason.clone()))
                }
            }
            BonusRule::PerIndicator {
                indicators,
                points,
                label,
            } => {
                let matched: Vec<&str> = analysis
                    .indicators
                    .intersection(indicators)
                    .map(String::as_str)
                    .collect();
                if matched.is_empty() {
                    return None;
                }
                let count = u32::try_from(matched.len()).unwrap_or(u32::MAX);
                Some((
                    points.saturating_mul(count),
                    format!("{label}: {}", matched.join(", ")),
                ))
            }
            BonusRule::AnyIndicator {
                indicators,
                points,
                reason,
            } => (!analysis.indicators.is_disjoint(indicators)).then(|| (*points, reason.clone())),
            BonusRule::FrameworkWithStructure {
                framework,
                flag,
                points,
                reason,
            } => (analysis.frameworks.contains(framework) && analysis.structure.has(*flag))
                .then(|| (*points, reason.clone())),
        }
    }
}

fn default_indicator_points() -> u32 {
    20
}

fn default_dependency_points() -> u32 {
    15
}

fn default_max_score() -> u32 {
    100
}

/// Point values used by the matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Points per indicator shared by project and profile
    #[serde(default = "default_indicator_points")]
    pub indicator_points: u32,
    /// Points per profile indicator that is also a literal dependency
    #[serde(default = "default_dependency_points")]
    pub dependency_points: u32,
    /// Scores saturate here
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    /// Profile name -> bonus rule
    #[serde(default = "stock_bonuses")]
    pub bonuses: BTreeMap<String, BonusRule>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            indicator_points: default_indicator_points(),
            dependency_points: default_dependency_points(),
            max_score: default_max_score(),
            bonuses: stock_bonuses(),
        }
    }
}

impl ScoringPolicy {
    /// Parse a YAML policy; omitted fields keep their stock values
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a YAML policy file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(CatalogError::fs(path))?;
        Self::from_yaml(&content)
    }

    pub fn bonus_for(&self, profile_name: &str) -> Option<&BonusRule> {
        self.bonuses.get(profile_name)
    }
}

fn strings(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Bonus table for the profiles shipped with the catalog
fn stock_bonuses() -> BTreeMap<String, BonusRule> {
    let mut bonuses = BTreeMap::new();

    bonuses.insert(
        "nextjs-frontend".to_string(),
        BonusRule::Framework {
            framework: "Next.js".into(),
            points: 50,
            reason: "Next.js detected".into(),
        },
    );
    bonuses.insert(
        "python-backend".to_string(),
        BonusRule::Platform {
            platform: "Python".into(),
            frameworks: vec!["FastAPI".into(), "Flask".into(), "Django".into()],
            framework_points: 40,
            framework_reason: "Python web framework".into(),
            platform_points: 20,
            platform_reason: "Python project".into(),
        },
    );
    bonuses.insert(
        "trading-fintech".to_string(),
        BonusRule::PerIndicator {
            indicators: strings(&[
                "ccxt",
                "alpaca",
                "trading",
                "arbitrage",
                "kalshi",
                "polymarket",
                "crypto",
            ]),
            points: 30,
            label: "trading".into(),
        },
    );
    bonuses.insert(
        "ai-ml".to_string(),
        BonusRule::AnyIndicator {
            indicators: strings(&["anthropic", "openai", "langchain", "llm", "embedding"]),
            points: 50,
            reason: "AI/ML indicators".into(),
        },
    );
    bonuses.insert(
        "fullstack".to_string(),
        BonusRule::FrameworkWithStructure {
            framework: "Next.js".into(),
            flag: StructureFlag::Db,
            points: 45,
            reason: "fullstack patterns".into(),
        },
    );

    bonuses
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis() -> ProjectAnalysis {
        ProjectAnalysis::default()
    }

    #[test]
    fn test_platform_rule() {
        let policy = ScoringPolicy::default();
        let rule = policy.bonus_for("python-backend").unwrap();

        let mut a = analysis();
        assert_eq!(rule.apply(&a), None);

        a.tech_stack.insert("Python".into());
        assert_eq!(rule.apply(&a), Some((20, "Python project".into())));

        a.frameworks.insert("Flask".into());
        assert_eq!(rule.apply(&a), Some((40, "Python web framework".into())));
    }

    #[test]
    fn test_per_indicator_rule() {
        let policy = ScoringPolicy::default();
        let rule = policy.bonus_for("trading-fintech").unwrap();

        let mut a = analysis();
        a.indicators.insert("kalshi".into());
        a.indicators.insert("crypto".into());
        a.indicators.insert("openai".into());
        assert_eq!(rule.apply(&a), Some((60, "trading: crypto, kalshi".into())));
    }

    #[test]
    fn test_framework_with_structure_rule() {
        let policy = ScoringPolicy::default();
        let rule = policy.bonus_for("fullstack").unwrap();

        let mut a = analysis();
        a.frameworks.insert("Next.js".into());
        assert_eq!(rule.apply(&a), None);

        a.structure.has_db = true;
        assert_eq!(rule.apply(&a), Some((45, "fullstack patterns".into())));
    }

    #[test]
    fn test_policy_yaml_override() {
        let yaml = r#"
indicator_points: 10
bonuses:
  data-eng:
    kind: any_indicator
    indicators: [postgresql, mongodb]
    points: 25
    reason: database work
"#;
        let policy = ScoringPolicy::from_yaml(yaml).unwrap();
        assert_eq!(policy.indicator_points, 10);
        assert_eq!(policy.dependency_points, 15);
        assert_eq!(policy.bonuses.len(), 1);

        let mut a = analysis();
        a.indicators.insert("mongodb".into());
        assert_eq!(
            policy.bonus_for("data-eng").unwrap().apply(&a),
            Some((25, "database work".into()))
        );
    }

    #[test]
    fn test_empty_policy_file_keeps_stock_values() {
        let policy = ScoringPolicy::from_yaml("{}").unwrap();
        assert_eq!(policy, ScoringPolicy::default());
    }
}

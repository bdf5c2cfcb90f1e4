//! agentcat Report - Periodic performance reports over feedback logs

pub mod render;
pub mod tracked;

pub use render::{render, render_markdown, render_summary, render_text, ReportFormat};
pub use tracked::{find_tracked_projects, render_all};

use agentcat_deploy::{ProjectStateStore, DISPATCHER_NAME};
use agentcat_feedback::stats::percent;
use agentcat_feedback::{aggregate, AgentStats, FeedbackStats, FeedbackStore};
use agentcat_types::{CatalogError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Agents with fewer tasks get no recommendation
pub const MIN_TASKS_FOR_RECOMMENDATION: usize = 3;

/// Profile shown when the project has no state record
pub const UNKNOWN_PROFILE: &str = "unknown";

/// Feedback of one project over a period
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: String,
    pub path: PathBuf,
    pub profile: String,
    pub period_days: u32,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub total_tasks: usize,
    pub total_accepted: usize,
    pub total_rejected: usize,
    pub overall_acceptance_rate: f64,
    #[serde(rename = "agent_stats", serialize_with = "agents_only")]
    pub stats: FeedbackStats,
    pub deployed_agents: Vec<String>,
    pub deployed_skills: Vec<String>,
}

fn agents_only<S: Serializer>(stats: &FeedbackStats, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    stats.agents.serialize(serializer)
}

impl ProjectReport {
    /// Report on the `days` days before `now`
    pub fn build(project_root: &Path, days: u32, now: NaiveDateTime) -> Result<Self> {
        if !project_root.is_dir() {
            return Err(CatalogError::ProjectNotFound(project_root.to_path_buf()));
        }

        let state = match ProjectStateStore::for_project(project_root).load() {
            Ok(state) => state,
            Err(e) => {
                warn!("Ignoring unreadable project state in {:?}: {}", project_root, e);
                None
            }
        };

        let events = FeedbackStore::for_project(project_root).load_since(now, days)?;
        let stats = aggregate(events);

        let (profile, deployed_agents, deployed_skills) = match state {
            Some(state) => (state.profile_name, state.deployed_agents, state.deployed_skills),
            None => (UNKNOWN_PROFILE.to_string(), Vec::new(), Vec::new()),
        };

        Ok(Self {
            project: project_root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: project_root.to_path_buf(),
            profile,
            period_days: days,
            period_start: (now - Duration::days(i64::from(days))).date(),
            period_end: now.date(),
            total_tasks: stats.total,
            total_accepted: stats.total_accepted(),
            total_rejected: stats.total_rejected(),
            overall_acceptance_rate: percent(stats.total_accepted(), stats.total),
            stats,
            deployed_agents,
            deployed_skills,
        })
    }

    /// Agents ordered by acceptance rate, best first
    pub fn ranked_agents(&self) -> Vec<(&str, &AgentStats)> {
        self.stats.agents_by_acceptance()
    }

    /// Verdicts for agents with enough tasks, by agent name
    pub fn recommendations(&self) -> Vec<Recommendation> {
        self.stats
            .agents
            .iter()
            .filter(|(_, stats)| stats.total >= MIN_TASKS_FOR_RECOMMENDATION)
            .filter_map(|(agent, stats)| {
                Verdict::for_rate(stats.acceptance_rate).map(|verdict| Recommendation {
                    agent: agent.clone(),
                    acceptance_rate: stats.acceptance_rate,
                    verdict,
                })
            })
            .collect()
    }

    /// Deployed agents without feedback in the period, sorted
    pub fn unused_agents(&self) -> Vec<String> {
        let unused: BTreeSet<&String> = self
            .deployed_agents
            .iter()
            .filter(|agent| agent.as_str() != DISPATCHER_NAME)
            .filter(|agent| !self.stats.agents.contains_key(agent.as_str()))
            .collect();
        unused.into_iter().cloned().collect()
    }
}

/// How an agent is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Below 60%
    VeryLow,
    /// 60% up to 80%
    BelowTarget,
    /// 90% and above
    Excellent,
}

impl Verdict {
    /// `None` for the unremarkable 80%..90% band
    pub fn for_rate(rate: f64) -> Option<Self> {
        if rate < 60.0 {
            Some(Verdict::VeryLow)
        } else if rate < 80.0 {
            Some(Verdict::BelowTarget)
        } else if rate >= 90.0 {
            Some(Verdict::Excellent)
        } else {
            None
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            Verdict::VeryLow => "❌",
            Verdict::BelowTarget => "⚠️ ",
            Verdict::Excellent => "✅",
        }
    }
}

/// A verdict on one agent
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub agent: String,
    pub acceptance_rate: f64,
    pub verdict: Verdict,
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rate = self.acceptance_rate;
        match self.verdict {
            Verdict::VeryLow => write!(
                f,
                "{}: Very low acceptance ({rate:.1}%) - consider reviewing task specifications or agent configuration",
                self.agent
            ),
            Verdict::BelowTarget => write!(f, "{}: Below target ({rate:.1}%) - may need clearer prompts", self.agent),
            Verdict::Excellent => write!(f, "{}: Excellent performance ({rate:.1}%)", self.agent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_bands() {
        assert_eq!(Verdict::for_rate(59.9), Some(Verdict::VeryLow));
        assert_eq!(Verdict::for_rate(60.0), Some(Verdict::BelowTarget));
        assert_eq!(Verdict::for_rate(79.9), Some(Verdict::BelowTarget));
        assert_eq!(Verdict::for_rate(85.0), None);
        assert_eq!(Verdict::for_rate(90.0), Some(Verdict::Excellent));
    }

    #[test]
    fn test_recommendation_text() {
        let rec = Recommendation {
            agent: "python-pro".into(),
            acceptance_rate: 100.0,
            verdict: Verdict::Excellent,
        };
        assert_eq!(rec.to_string(), "python-pro: Excellent performance (100.0%)");
    }
}

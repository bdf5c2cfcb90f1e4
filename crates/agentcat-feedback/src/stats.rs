//! Per-agent statistics over a window of feedback events

use agentcat_types::{FeedbackEvent, Outcome, ProjectMetrics};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rollup for one agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    pub total: usize,
    pub accepted: usize,
    pub rejected: usize,
    /// Events whose outcome was `iteration`
    pub iterations: usize,
    /// Sum of `iteration_count` across all events
    pub total_iterations: u64,
    /// Percent, one decimal place
    pub acceptance_rate: f64,
    /// Two decimal places
    pub avg_iterations: f64,
    /// Rejection reason -> occurrences
    pub reasons: BTreeMap<String, usize>,
}

/// Rollup for a whole window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackStats {
    pub total: usize,
    pub agents: BTreeMap<String, AgentStats>,
}

/// Group events by agent and compute rates
///
/// Groups live in an ordered map, so the output does not depend on the
/// order events were stored in.
pub fn aggregate<I>(events: I) -> FeedbackStats
where
    I: IntoIterator<Item = FeedbackEvent>,
{
    let mut stats = FeedbackStats::default();

    for event in events {
        stats.total += 1;
        let agent = stats.agents.entry(event.agent_name).or_default();
        agent.total += 1;
        agent.total_iterations += u64::from(event.iteration_count);

        match event.outcome {
            Outcome::Accepted => agent.accepted += 1,
            Outcome::Rejected => {
                agent.rejected += 1;
                if let Some(reason) = event.reason.filter(|r| !r.is_empty()) {
                    *agent.reasons.entry(reason).or_insert(0) += 1;
                }
            }
            Outcome::Iteration => agent.iterations += 1,
        }
    }

    for agent in stats.agents.values_mut() {
        agent.acceptance_rate = percent(agent.accepted, agent.total);
        agent.avg_iterations = if agent.total > 0 {
            round_to(agent.total_iterations as f64 / agent.total as f64, 2)
        } else {
            0.0
        };
    }

    stats
}

/// `round(100 * part / whole, 1)`, or 0 when `whole` is 0
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round_to(part as f64 / whole as f64 * 100.0, 1)
}

/// Round to `places` decimals, exact halves to even
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

impl FeedbackStats {
    pub fn total_accepted(&self) -> usize {
        self.agents.values().map(|a| a.accepted).sum()
    }

    pub fn total_rejected(&self) -> usize {
        self.agents.values().map(|a| a.rejected).sum()
    }

    /// Overall acceptance percentage
    pub fn acceptance_rate(&self) -> f64 {
        percent(self.total_accepted(), self.total)
    }

    /// Reasons summed across agents, most frequent first
    pub fn rejection_reasons(&self) -> Vec<(String, usize)> {
        let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
        for agent in self.agents.values() {
            for (reason, count) in &agent.reasons {
                *totals.entry(reason.as_str()).or_insert(0) += count;
            }
        }

        let mut reasons: Vec<(String, usize)> = totals
            .into_iter()
            .map(|(reason, count)| (reason.to_string(), count))
            .collect();
        reasons.sort_by(|a, b| b.1.cmp(&a.1));
        reasons
    }

    /// Agents ordered by acceptance rate, best first. Ties keep name order.
    pub fn agents_by_acceptance(&self) -> Vec<(&str, &AgentStats)> {
        let mut agents: Vec<(&str, &AgentStats)> = self
            .agents
            .iter()
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();
        agents.sort_by(|a, b| b.1.acceptance_rate.total_cmp(&a.1.acceptance_rate));
        agents
    }

    /// Project-level metrics block for the project-state record
    pub fn rollup(&self, now: NaiveDateTime) -> ProjectMetrics {
        ProjectMetrics {
            total_tasks: self.total,
            accepted: self.total_accepted(),
            rejected: self.total_rejected(),
            acceptance_rate: self.acceptance_rate(),
            last_updated: Some(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(agent: &str, outcome: Outcome) -> FeedbackEvent {
        FeedbackEvent::new(agent, "task", outcome)
    }

    #[test]
    fn test_accept_reject_accept() {
        let events = vec![
            event("X", Outcome::Accepted),
            event("X", Outcome::Rejected).with_reason("wrong approach"),
            event("X", Outcome::Accepted),
        ];

        let stats = aggregate(events);
        let x = &stats.agents["X"];
        assert_eq!(stats.total, 3);
        assert_eq!(x.total, 3);
        assert_eq!(x.accepted, 2);
        assert_eq!(x.rejected, 1);
        assert_eq!(x.acceptance_rate, 66.7);
        assert_eq!(x.reasons.get("wrong approach"), Some(&1));
        assert_eq!(x.reasons.len(), 1);
    }

    #[test]
    fn test_halves_round_to_even() {
        let mut events = vec![event("X", Outcome::Accepted)];
        events.extend((0..15).map(|_| event("X", Outcome::Rejected)));
        let stats = aggregate(events);
        assert_eq!(stats.agents["X"].acceptance_rate, 6.2);
        assert_eq!(percent(1, 16), 6.2);

        let mut events: Vec<_> = (0..7).map(|_| event("Y", Outcome::Accepted)).collect();
        events.push(event("Y", Outcome::Iteration).with_iterations(2));
        let stats = aggregate(events);
        assert_eq!(stats.agents["Y"].total_iterations, 9);
        assert_eq!(stats.agents["Y"].avg_iterations, 1.12);
    }

    #[test]
    fn test_empty_input() {
        let stats = aggregate(Vec::new());
        assert_eq!(stats.total, 0);
        assert!(stats.agents.is_empty());
        assert_eq!(stats.acceptance_rate(), 0.0);
        assert_eq!(percent(0, 0), 0.0);
    }

    #[test]
    fn test_avg_iterations_and_iteration_outcomes() {
        let events = vec![
            event("a", Outcome::Iteration).with_iterations(3),
            event("a", Outcome::Accepted).with_iterations(2),
            event("a", Outcome::Accepted),
        ];
        let stats = aggregate(events);
        let a = &stats.agents["a"];
        assert_eq!(a.iterations, 1);
        assert_eq!(a.total_iterations, 6);
        assert_eq!(a.avg_iterations, 2.0);
        assert_eq!(a.acceptance_rate, 66.7);
    }

    #[test]
    fn test_reason_ignored_unless_rejected() {
        let events = vec![
            event("a", Outcome::Accepted).with_reason("not counted"),
            event("a", Outcome::Rejected).with_reason(""),
        ];
        let stats = aggregate(events);
        assert!(stats.agents["a"].reasons.is_empty());
    }

    #[test]
    fn test_grouping_is_order_independent() {
        let forward = vec![
            event("b", Outcome::Accepted),
            event("a", Outcome::Rejected).with_reason("slow"),
            event("b", Outcome::Rejected).with_reason("slow"),
        ];
        let mut backward = forward.clone();
        backward.reverse();

        assert_eq!(aggregate(forward), aggregate(backward));
    }

    #[test]
    fn test_rollup_and_reasons() {
        let events = vec![
            event("a", Outcome::Rejected).with_reason("slow"),
            event("b", Outcome::Rejected).with_reason("slow"),
            event("b", Outcome::Rejected).with_reason("wrong file"),
            event("b", Outcome::Accepted),
        ];
        let stats = aggregate(events);
        assert_eq!(
            stats.rejection_reasons(),
            vec![("slow".to_string(), 2), ("wrong file".to_string(), 1)]
        );

        let now = agentcat_types::timestamp::now();
        let metrics = stats.rollup(now);
        assert_eq!(metrics.total_tasks, 4);
        assert_eq!(metrics.accepted, 1);
        assert_eq!(metrics.rejected, 3);
        assert_eq!(metrics.acceptance_rate, 25.0);
        assert_eq!(metrics.last_updated, Some(now));
    }

    #[test]
    fn test_agents_by_acceptance() {
        let events = vec![
            event("low", Outcome::Rejected),
            event("high", Outcome::Accepted),
        ];
        let stats = aggregate(events);
        let names: Vec<&str> = stats.agents_by_acceptance().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["high", "low"]);
    }
}

//! Feedback log records (`.claude/metrics/feedback.jsonl`)

use crate::error::CatalogError;
use crate::timestamp::serde_ts;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of one agent task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Accepted,
    Rejected,
    Iteration,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
            Outcome::Iteration => "iteration",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Outcome {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accepted" => Ok(Outcome::Accepted),
            "rejected" => Ok(Outcome::Rejected),
            "iteration" => Ok(Outcome::Iteration),
            _ => Err(CatalogError::InvalidOutcome(s.to_string())),
        }
    }
}

fn default_iterations() -> u32 {
    1
}

/// One line of the feedback log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    #[serde(rename = "ts", with = "serde_ts")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "agent")]
    pub agent_name: String,
    #[serde(rename = "task")]
    pub task_description: String,
    pub outcome: Outcome,
    #[serde(rename = "iterations", default = "default_iterations")]
    pub iteration_count: u32,
    /// Only meaningful for rejected tasks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(rename = "tokens", default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u64>,
}

impl FeedbackEvent {
    /// New event stamped with the current local time
    pub fn new(agent: impl Into<String>, task: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            timestamp: crate::timestamp::now(),
            agent_name: agent.into(),
            task_description: task.into(),
            outcome,
            iteration_count: 1,
            reason: None,
            token_count: None,
        }
    }

    pub fn at(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iteration_count = iterations;
        self
    }

    pub fn with_tokens(mut self, tokens: u64) -> Self {
        self.token_count = Some(tokens);
        self
    }
}

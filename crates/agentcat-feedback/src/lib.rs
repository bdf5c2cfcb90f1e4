//! Append-only feedback log for agent task outcomes
//!
//! One JSON object per line in `<project>/.claude/metrics/feedback.jsonl`.
//! Reads are lazy and skip lines they cannot parse, so a torn write costs at
//! most one event. Statistics are always recomputed from the whole window.
//!
//! The log assumes a single writer at a time. No file locking is used;
//! concurrent appends from several processes may interleave.

pub mod stats;

pub use stats::{aggregate, AgentStats, FeedbackStats};

use agentcat_types::{CatalogError, FeedbackEvent, Result, CONFIG_DIR};
use chrono::{Duration, NaiveDateTime};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Lines, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory under the config root holding the log
pub const METRICS_DIR: &str = "metrics";
/// Log file name
pub const FEEDBACK_LOG: &str = "feedback.jsonl";
/// Task descriptions are cut to this many characters
pub const MAX_TASK_CHARS: usize = 200;

/// Feedback log of one project
#[derive(Debug, Clone)]
pub struct FeedbackStore {
    log_path: PathBuf,
}

impl FeedbackStore {
    /// Store at the conventional location inside `project_root`
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(
            project_root
                .join(CONFIG_DIR)
                .join(METRICS_DIR)
                .join(FEEDBACK_LOG),
        )
    }

    /// Store backed by an explicit log file
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
        }
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Create the metrics directory and an empty log if they are missing
    pub fn ensure_log(&self) -> Result<()> {
        if let Some(dir) = self.log_path.parent() {
            fs::create_dir_all(dir).map_err(CatalogError::fs(dir))?;
        }
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(CatalogError::fs(&self.log_path))?;
        Ok(())
    }

    /// Validate, normalize and append one event
    pub fn append(&self, event: &FeedbackEvent) -> Result<()> {
        if event.agent_name.trim().is_empty() {
            return Err(CatalogError::InvalidFeedback(
                "agent name cannot be empty".into(),
            ));
        }
        if event.iteration_count == 0 {
            return Err(CatalogError::InvalidFeedback(
                "iteration count must be at least 1".into(),
            ));
        }

        let mut record = event.clone();
        record.task_description = truncate_chars(&record.task_description, MAX_TASK_CHARS);
        record.reason = record.reason.filter(|r| !r.is_empty());
        record.token_count = record.token_count.filter(|t| *t > 0);

        let line = serde_json::to_string(&record)?;

        if let Some(dir) = self.log_path.parent() {
            fs::create_dir_all(dir).map_err(CatalogError::fs(dir))?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(CatalogError::fs(&self.log_path))?;
        writeln!(file, "{line}").map_err(CatalogError::fs(&self.log_path))?;

        debug!(
            "Logged feedback: {} | {} | {}",
            record.agent_name, record.outcome, record.task_description
        );
        Ok(())
    }

    /// Events from the last `window_days` days, relative to the local clock
    pub fn load(&self, window_days: u32) -> Result<Events> {
        self.load_since(agentcat_types::timestamp::now(), window_days)
    }

    /// Events with a timestamp strictly after `now - window_days`
    pub fn load_since(&self, now: NaiveDateTime, window_days: u32) -> Result<Events> {
        let cutoff = now - Duration::days(i64::from(window_days));

        let lines = match File::open(&self.log_path) {
            Ok(file) => Some(BufReader::new(file).lines()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(CatalogError::fs(&self.log_path)(e)),
        };

        Ok(Events { lines, cutoff })
    }
}

/// Lazy, windowed iterator over a feedback log
pub struct Events {
    lines: Option<Lines<BufReader<File>>>,
    cutoff: NaiveDateTime,
}

impl Iterator for Events {
    type Item = FeedbackEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let lines = self.lines.as_mut()?;
        for line in lines {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    debug!("Skipping unreadable feedback line: {}", e);
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<FeedbackEvent>(&line) {
                Ok(event) if event.timestamp > self.cutoff => return Some(event),
                Ok(_) => {}
                Err(e) => debug!("Skipping malformed feedback line: {}", e),
            }
        }
        None
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

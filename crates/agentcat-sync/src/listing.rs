//! Remote directory listings

use crate::command::run_captured;
use crate::error::Result;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default deadline for one listing request
pub const DEFAULT_LISTING_TIMEOUT: Duration = Duration::from_secs(30);

/// Lists the subdirectories of a path in a remote repository
///
/// Implementations never fail: an unreachable remote lists as empty.
pub trait RemoteListing: Send + Sync {
    fn list_subdirectories(&self, repo: &str, path: &str) -> impl Future<Output = Vec<String>> + Send;
}

/// Listing through the GitHub CLI (`gh api repos/<repo>/contents/<path>`)
#[derive(Debug, Clone)]
pub struct GhCli {
    program: String,
    timeout: Duration,
}

impl Default for GhCli {
    fn default() -> Self {
        Self::new(DEFAULT_LISTING_TIMEOUT)
    }
}

impl GhCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "gh".to_string(),
            timeout,
        }
    }

    /// Use another executable in place of `gh`
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn fetch(&self, repo: &str, path: &str) -> Result<Vec<String>> {
        let endpoint = format!("repos/{repo}/contents/{path}");
        let stdout = run_captured(&self.program, &["api", &endpoint], None, self.timeout).await?;
        parse_contents(&stdout)
    }
}

impl RemoteListing for GhCli {
    async fn list_subdirectories(&self, repo: &str, path: &str) -> Vec<String> {
        match self.fetch(repo, path).await {
            Ok(names) => names,
            Err(e) => {
                warn!("Error checking {}: {}", repo, e);
                Vec::new()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Directory names from a GitHub contents response
pub fn parse_contents(json: &str) -> Result<Vec<String>> {
    let entries: Vec<ContentEntry> = serde_json::from_str(json)?;
    Ok(entries
        .into_iter()
        .filter(|e| e.kind == "dir")
        .map(|e| e.name)
        .collect())
}

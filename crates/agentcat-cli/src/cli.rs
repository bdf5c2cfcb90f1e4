use agentcat_report::ReportFormat;
use agentcat_types::Outcome;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Profile-driven catalog of coding-assistant agents and skills
#[derive(Debug, Parser)]
#[command(name = "agentcat", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a project and recommend a profile
    Analyze {
        project: PathBuf,
        /// Print the recommendation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Deploy a profile's agents and skills into a project
    Deploy(DeployArgs),

    /// Redeploy the recorded profile, overwriting local copies
    Sync { project: PathBuf },

    /// List profiles and curated agents
    List,

    /// Record the outcome of an agent task
    Feedback(FeedbackArgs),

    /// Per-agent statistics for recent feedback
    Summary {
        project: PathBuf,
        #[arg(long)]
        days: Option<u32>,
    },

    /// Recompute the metrics cached in the project record
    RefreshMetrics { project: PathBuf },

    /// Performance report for one or all tracked projects
    Report(ReportArgs),

    /// Refresh mirrors and look for new upstream skills
    CheckUpdates,
}

#[derive(Debug, Args)]
pub struct DeployArgs {
    pub project: PathBuf,

    /// Profile to deploy
    #[arg(long, conflicts_with = "auto", required_unless_present = "auto")]
    pub profile: Option<String>,

    /// Deploy the best-matching profile
    #[arg(long)]
    pub auto: bool,

    /// Overwrite artifacts already in the project
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct FeedbackArgs {
    pub project: PathBuf,

    #[arg(long)]
    pub agent: String,

    #[arg(long)]
    pub task: String,

    /// accepted, rejected or iteration
    #[arg(long)]
    pub outcome: Outcome,

    #[arg(long)]
    pub reason: Option<String>,

    #[arg(long, default_value_t = 1)]
    pub iterations: u32,

    #[arg(long)]
    pub tokens: Option<u64>,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub project: Option<PathBuf>,

    /// Report on every tracked project
    #[arg(long)]
    pub all: bool,

    #[arg(long)]
    pub days: Option<u32>,

    /// text, markdown or json
    #[arg(long, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("agentcat").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_deploy_requires_profile_or_auto() {
        assert!(parse(&["deploy", "/tmp/shop"]).is_err());
        assert!(parse(&["deploy", "/tmp/shop", "--profile", "a", "--auto"]).is_err());

        let cli = parse(&["deploy", "/tmp/shop", "--auto", "--force"]).unwrap();
        match cli.command {
            Command::Deploy(args) => {
                assert!(args.auto);
                assert!(args.force);
                assert!(args.profile.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_feedback_outcome_parsing() {
        let cli = parse(&[
            "feedback", "/tmp/shop", "--agent", "python-pro", "--task", "fix", "--outcome", "rejected",
            "--reason", "wrong approach",
        ])
        .unwrap();
        match cli.command {
            Command::Feedback(args) => {
                assert_eq!(args.outcome, Outcome::Rejected);
                assert_eq!(args.iterations, 1);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(parse(&["feedback", "/tmp/shop", "--agent", "a", "--task", "t", "--outcome", "maybe"]).is_err());
    }

    #[test]
    fn test_report_format() {
        let cli = parse(&["report", "--all", "--format", "markdown"]).unwrap();
        match cli.command {
            Command::Report(args) => {
                assert!(args.all);
                assert_eq!(args.format, ReportFormat::Markdown);
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(parse(&["report"]).is_err());
    }
}

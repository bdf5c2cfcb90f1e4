//! Text, Markdown and JSON renderings

use crate::ProjectReport;
use agentcat_feedback::{AgentStats, FeedbackStats};
use agentcat_types::Result;
use std::fmt;
use std::str::FromStr;

pub(crate) fn heavy_rule() -> String {
    "═".repeat(70)
}

const LIGHT_RULE: &str = "  ─────────────────────────────────────────";

/// Output format of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unknown report format '{other}' (text, markdown, json)")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Text => "text",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
        })
    }
}

/// Render one report
pub fn render(report: &ProjectReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Markdown => Ok(render_markdown(report)),
        ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

fn marker(rate: f64) -> &'static str {
    if rate >= 80.0 {
        "✅"
    } else if rate >= 60.0 {
        "⚠️ "
    } else {
        "❌"
    }
}

fn agent_table(lines: &mut Vec<String>, agents: &[(&str, &AgentStats)]) {
    lines.push(format!("  {:<25} {:>8} {:>6} {:>10}", "Agent", "Accept%", "Tasks", "Avg Iter"));
    lines.push(format!("  {} {} {} {}", "-".repeat(25), "-".repeat(8), "-".repeat(6), "-".repeat(10)));
    for (agent, stats) in agents {
        lines.push(format!(
            "  {}{:<23} {:>7.1}% {:>6} {:>10.2}",
            marker(stats.acceptance_rate),
            agent,
            stats.acceptance_rate,
            stats.total,
            stats.avg_iterations
        ));
    }
}

fn rejection_reasons(lines: &mut Vec<String>, stats: &FeedbackStats) {
    for (reason, count) in stats.rejection_reasons() {
        lines.push(format!("    • {reason}: {count}"));
    }
}

/// Plain-text report for a terminal
pub fn render_text(report: &ProjectReport) -> String {
    let mut lines = vec![
        heavy_rule(),
        format!("  WEEKLY PERFORMANCE REPORT: {}", report.project),
        format!("  Profile: {}", report.profile),
        format!("  Period: {} to {}", report.period_start, report.period_end),
        heavy_rule(),
    ];

    if report.total_tasks == 0 {
        lines.push("\n  No activity recorded in this period.".to_string());
        lines.push("\n  To log feedback, use:".to_string());
        lines.push(format!(
            "    agentcat feedback {} --agent <name> --task <desc> --outcome accepted",
            report.path.display()
        ));
        lines.push(heavy_rule());
        return lines.join("\n");
    }

    lines.push("\n  SUMMARY".to_string());
    lines.push(LIGHT_RULE.to_string());
    lines.push(format!("  Total Tasks:      {}", report.total_tasks));
    lines.push(format!(
        "  Accepted:         {} ({:.1}%)",
        report.total_accepted, report.overall_acceptance_rate
    ));
    lines.push(format!("  Rejected:         {}", report.total_rejected));

    lines.push("\n  AGENT PERFORMANCE".to_string());
    lines.push(LIGHT_RULE.to_string());
    agent_table(&mut lines, &report.ranked_agents());

    if !report.stats.rejection_reasons().is_empty() {
        lines.push("\n  REJECTION REASONS".to_string());
        lines.push(LIGHT_RULE.to_string());
        rejection_reasons(&mut lines, &report.stats);
    }

    lines.push("\n  RECOMMENDATIONS".to_string());
    lines.push(LIGHT_RULE.to_string());
    let recommendations = report.recommendations();
    if recommendations.is_empty() {
        lines.push("  No specific recommendations - keep monitoring for more data".to_string());
    }
    for rec in recommendations {
        lines.push(format!("  {} {}", rec.verdict.marker(), rec));
    }

    let unused = report.unused_agents();
    if !unused.is_empty() {
        lines.push("\n  UNUSED AGENTS (consider removing or training)".to_string());
        lines.push(LIGHT_RULE.to_string());
        for agent in unused {
            lines.push(format!("    • {agent}"));
        }
    }

    lines.push(format!("\n{}", heavy_rule()));
    lines.join("\n")
}

/// Markdown report for sharing
pub fn render_markdown(report: &ProjectReport) -> String {
    let mut lines = vec![
        format!("# Weekly Report: {}", report.project),
        format!("\n**Profile:** {}", report.profile),
        format!("**Period:** {} to {}", report.period_start, report.period_end),
        String::new(),
    ];

    if report.total_tasks == 0 {
        lines.push("*No activity recorded in this period.*".to_string());
        return lines.join("\n");
    }

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    lines.push(format!("| Total Tasks | {} |", report.total_tasks));
    lines.push(format!(
        "| Accepted | {} ({:.1}%) |",
        report.total_accepted, report.overall_acceptance_rate
    ));
    lines.push(format!("| Rejected | {} |", report.total_rejected));
    lines.push(String::new());

    lines.push("## Agent Performance".to_string());
    lines.push(String::new());
    lines.push("| Agent | Acceptance | Tasks | Avg Iterations |".to_string());
    lines.push("|-------|------------|-------|----------------|".to_string());
    for (agent, stats) in report.ranked_agents() {
        lines.push(format!(
            "| {} {} | {:.1}% | {} | {:.2} |",
            marker(stats.acceptance_rate).trim_end(),
            agent,
            stats.acceptance_rate,
            stats.total,
            stats.avg_iterations
        ));
    }
    lines.push(String::new());

    let recommendations = report.recommendations();
    if !recommendations.is_empty() {
        lines.push("## Recommendations".to_string());
        lines.push(String::new());
        for rec in recommendations {
            lines.push(format!("- {rec}"));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Short per-agent summary printed by the `summary` command
pub fn render_summary(project: &str, project_path: &str, days: u32, stats: &FeedbackStats) -> String {
    let rule = "=".repeat(60);
    let mut lines = vec![
        String::new(),
        rule.clone(),
        format!("  METRICS SUMMARY: {project}"),
        format!("  Period: Last {days} days | Total interactions: {}", stats.total),
        rule.clone(),
    ];

    if stats.agents.is_empty() {
        lines.push("\n  No feedback data found.".to_string());
        lines.push(format!(
            "  Start logging with: agentcat feedback {project_path} --agent <name> --task <desc> --outcome <accepted|rejected>"
        ));
        lines.push(format!("\n{rule}\n"));
        return lines.join("\n");
    }

    lines.push("\n  AGENT PERFORMANCE:".to_string());
    agent_table(&mut lines, &stats.agents_by_acceptance());

    if !stats.rejection_reasons().is_empty() {
        lines.push("\n  REJECTION REASONS:".to_string());
        rejection_reasons(&mut lines, stats);
    }

    lines.push(format!("\n{rule}\n"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("Markdown".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("html".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_marker_bands() {
        assert_eq!(marker(80.0), "✅");
        assert_eq!(marker(60.0), "⚠️ ");
        assert_eq!(marker(59.9), "❌");
    }

    #[test]
    fn test_empty_summary() {
        let out = render_summary("shop", "/tmp/shop", 7, &FeedbackStats::default());
        assert!(out.contains("METRICS SUMMARY: shop"));
        assert!(out.contains("No feedback data found."));
    }
}

//! Reports over temporary projects with hand-written feedback logs

use agentcat_deploy::ProjectStateStore;
use agentcat_feedback::FeedbackStore;
use agentcat_report::{find_tracked_projects, render, render_all, ProjectReport, ReportFormat, Verdict};
use agentcat_types::{timestamp, FeedbackEvent, Outcome, ProjectMetrics, ProjectState};
use chrono::{Duration, NaiveDateTime};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn now() -> NaiveDateTime {
    timestamp::parse("2026-10-18T12:00:00.000000").unwrap()
}

fn track(project: &Path, agents: &[&str]) {
    let state = ProjectState {
        project_name: project.file_name().unwrap().to_string_lossy().into_owned(),
        profile_name: "python-backend".into(),
        created_at: now(),
        last_sync_at: now(),
        catalog_version: "1.0".into(),
        deployed_agents: agents.iter().map(|a| a.to_string()).collect(),
        deployed_skills: vec!["api-design".into()],
        metrics: ProjectMetrics::default(),
    };
    ProjectStateStore::for_project(project).save(&state).unwrap();
}

fn log(project: &Path, agent: &str, outcome: Outcome, hours_ago: i64) {
    let event = FeedbackEvent::new(agent, "task", outcome).at(now() - Duration::hours(hours_ago));
    let event = if outcome == Outcome::Rejected {
        event.with_reason("wrong approach")
    } else {
        event
    };
    FeedbackStore::for_project(project).append(&event).unwrap();
}

#[test]
fn test_report_totals_and_recommendations() {
    let project = TempDir::new().unwrap();
    track(project.path(), &["python-pro", "code-reviewer", "idle-agent", "agent-organizer"]);

    for _ in 0..3 {
        log(project.path(), "python-pro", Outcome::Accepted, 1);
    }
    log(project.path(), "code-reviewer", Outcome::Accepted, 2);
    log(project.path(), "code-reviewer", Outcome::Rejected, 2);
    log(project.path(), "code-reviewer", Outcome::Rejected, 2);
    // outside the 7 day window
    log(project.path(), "idle-agent", Outcome::Accepted, 24 * 8);

    let report = ProjectReport::build(project.path(), 7, now()).unwrap();
    assert_eq!(report.profile, "python-backend");
    assert_eq!(report.total_tasks, 6);
    assert_eq!(report.total_accepted, 4);
    assert_eq!(report.total_rejected, 2);
    assert_eq!(report.overall_acceptance_rate, 66.7);
    assert_eq!(report.period_start.to_string(), "2026-10-11");
    assert_eq!(report.period_end.to_string(), "2026-10-18");

    let recs = report.recommendations();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].agent, "code-reviewer");
    assert_eq!(recs[0].verdict, Verdict::VeryLow);
    assert_eq!(recs[1].agent, "python-pro");
    assert_eq!(recs[1].verdict, Verdict::Excellent);

    assert_eq!(report.unused_agents(), vec!["idle-agent"]);

    let ranked: Vec<&str> = report.ranked_agents().into_iter().map(|(a, _)| a).collect();
    assert_eq!(ranked, vec!["python-pro", "code-reviewer"]);
}

#[test]
fn test_untracked_project_is_unknown() {
    let project = TempDir::new().unwrap();

    let report = ProjectReport::build(project.path(), 7, now()).unwrap();
    assert_eq!(report.profile, "unknown");
    assert_eq!(report.total_tasks, 0);
    assert_eq!(report.overall_acceptance_rate, 0.0);

    let text = render(&report, ReportFormat::Text).unwrap();
    assert!(text.contains("No activity recorded in this period."));
}

#[test]
fn test_renderings() {
    let project = TempDir::new().unwrap();
    track(project.path(), &["python-pro"]);
    log(project.path(), "python-pro", Outcome::Accepted, 1);
    log(project.path(), "python-pro", Outcome::Rejected, 1);

    let report = ProjectReport::build(project.path(), 7, now()).unwrap();

    let text = render(&report, ReportFormat::Text).unwrap();
    assert!(text.contains("WEEKLY PERFORMANCE REPORT"));
    assert!(text.contains("• wrong approach: 1"));
    assert!(text.contains("No specific recommendations"));

    let markdown = render(&report, ReportFormat::Markdown).unwrap();
    assert!(markdown.starts_with("# Weekly Report: "));
    assert!(markdown.contains("| Total Tasks | 2 |"));

    let json: serde_json::Value = serde_json::from_str(&render(&report, ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["total_tasks"], 2);
    assert_eq!(json["period_start"], "2026-10-11");
    assert_eq!(json["agent_stats"]["python-pro"]["rejected"], 1);
}

#[test]
fn test_tracked_projects() {
    let root = TempDir::new().unwrap();
    for name in ["zeta", "alpha"] {
        let project = root.path().join(name);
        fs::create_dir_all(&project).unwrap();
        track(&project, &[]);
    }
    fs::create_dir_all(root.path().join("untracked")).unwrap();

    let projects = find_tracked_projects(root.path()).unwrap();
    let names: Vec<String> = projects
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["alpha", "zeta"]);

    let all = render_all(root.path(), 7, ReportFormat::Text, now()).unwrap();
    assert!(all.contains("Projects tracked: 2"));
    assert!(all.find("alpha").unwrap() < all.find("zeta").unwrap());
}

#[test]
fn test_no_tracked_projects() {
    let root = TempDir::new().unwrap();
    let all = render_all(root.path(), 7, ReportFormat::Text, now()).unwrap();
    assert_eq!(all, "No tracked projects found.");
}

//! Feedback log behaviour against a real filesystem

use agentcat_feedback::{aggregate, FeedbackStore, MAX_TASK_CHARS};
use agentcat_types::{timestamp, CatalogError, FeedbackEvent, Outcome};
use chrono::Duration;
use std::fs;
use std::io::Write;

#[test]
fn test_append_creates_log_and_directories() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());
    assert!(!store.log_path().exists());

    store
        .append(&FeedbackEvent::new("python-pro", "refactor auth", Outcome::Accepted))
        .unwrap();

    let content = fs::read_to_string(store.log_path()).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.contains(r#""agent":"python-pro""#));
}

#[test]
fn test_append_is_append_only() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());

    store
        .append(&FeedbackEvent::new("a", "first", Outcome::Accepted))
        .unwrap();
    let first = fs::read_to_string(store.log_path()).unwrap();

    store
        .append(&FeedbackEvent::new("a", "second", Outcome::Rejected).with_reason("scope"))
        .unwrap();
    let second = fs::read_to_string(store.log_path()).unwrap();

    assert!(second.starts_with(&first));
    assert_eq!(second.lines().count(), 2);
}

#[test]
fn test_append_truncates_task() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());

    let long_task = "x".repeat(500);
    store
        .append(&FeedbackEvent::new("a", long_task, Outcome::Iteration))
        .unwrap();

    let events: Vec<_> = store.load(7).unwrap().collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].task_description.chars().count(), MAX_TASK_CHARS);
}

#[test]
fn test_append_rejects_zero_iterations() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());

    let result = store.append(&FeedbackEvent::new("a", "t", Outcome::Accepted).with_iterations(0));
    assert!(matches!(result, Err(CatalogError::InvalidFeedback(_))));
    assert!(!store.log_path().exists());
}

#[test]
fn test_missing_log_yields_nothing() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());
    assert_eq!(store.load(30).unwrap().count(), 0);
}

#[test]
fn test_window_boundary_is_strict() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());
    let now = timestamp::parse("2026-10-18T12:00:00").unwrap();
    let cutoff = now - Duration::days(7);

    store
        .append(&FeedbackEvent::new("at-cutoff", "t", Outcome::Accepted).at(cutoff))
        .unwrap();
    store
        .append(
            &FeedbackEvent::new("after-cutoff", "t", Outcome::Accepted)
                .at(cutoff + Duration::seconds(1)),
        )
        .unwrap();
    store
        .append(
            &FeedbackEvent::new("before-cutoff", "t", Outcome::Accepted)
                .at(cutoff - Duration::days(1)),
        )
        .unwrap();

    let agents: Vec<String> = store
        .load_since(now, 7)
        .unwrap()
        .map(|e| e.agent_name)
        .collect();
    assert_eq!(agents, vec!["after-cutoff"]);
}

#[test]
fn test_malformed_lines_are_skipped() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());
    store.ensure_log().unwrap();

    let now = timestamp::now();
    let good = FeedbackEvent::new("X", "t", Outcome::Accepted).at(now - Duration::hours(1));
    store.append(&good).unwrap();

    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(store.log_path())
        .unwrap();
    writeln!(file, "{{not json").unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"ts": "2026-10-18T12:00:00", "agent": "X"}}"#).unwrap();
    writeln!(file, r#"{{"ts": "garbage", "agent": "X", "task": "t", "outcome": "accepted"}}"#).unwrap();
    file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
    drop(file);

    store.append(&good).unwrap();

    let stats = aggregate(store.load_since(now, 30).unwrap());
    assert_eq!(stats.total, 2);
    assert_eq!(stats.agents["X"].accepted, 2);
}

#[test]
fn test_ensure_log_is_idempotent() {
    let project = tempfile::tempdir().unwrap();
    let store = FeedbackStore::for_project(project.path());

    store.append(&FeedbackEvent::new("a", "t", Outcome::Accepted)).unwrap();
    store.ensure_log().unwrap();
    store.ensure_log().unwrap();

    assert_eq!(fs::read_to_string(store.log_path()).unwrap().lines().count(), 1);
}

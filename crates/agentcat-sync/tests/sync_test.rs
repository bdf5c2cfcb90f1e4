//! Sync scenarios with a scripted remote listing

use agentcat_sync::{
    apply_checkout, discover_new_skills, mirror_repo, CatalogSync, MirrorStatus, RemoteListing,
    RepoMirror, SkillSource, SyncReport,
};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

struct FakeListing {
    repos: HashMap<String, Vec<String>>,
}

impl FakeListing {
    fn new(entries: &[(&str, &[&str])]) -> Arc<Self> {
        Arc::new(Self {
            repos: entries
                .iter()
                .map(|(repo, names)| (repo.to_string(), names.iter().map(|n| n.to_string()).collect()))
                .collect(),
        })
    }
}

impl RemoteListing for FakeListing {
    async fn list_subdirectories(&self, repo: &str, _path: &str) -> Vec<String> {
        self.repos.get(repo).cloned().unwrap_or_default()
    }
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn sources() -> Vec<SkillSource> {
    vec![
        SkillSource::new("anthropics/skills", "skills", "anthropic"),
        SkillSource::new("vercel-labs/agent-skills", "skills", "vercel"),
    ]
}

#[tokio::test]
async fn test_discovers_only_missing_skills() {
    let catalog = TempDir::new().unwrap();
    write(catalog.path(), "skills/anthropic/pdf/SKILL.md", "pdf");

    let listing = FakeListing::new(&[
        ("anthropics/skills", &["pdf", "docx"]),
        ("vercel-labs/agent-skills", &["react-best-practices", "../escape"]),
    ]);

    let found = discover_new_skills(catalog.path(), &sources(), listing).await.unwrap();
    let names: Vec<(&str, &str)> = found.iter().map(|s| (s.source.as_str(), s.name.as_str())).collect();
    assert_eq!(names, vec![("anthropic", "docx"), ("vercel", "react-best-practices")]);
    assert_eq!(found[0].url, "https://github.com/anthropics/skills/tree/main/skills/docx");
    assert_eq!(found[0].repo, "anthropics/skills");
}

#[tokio::test]
async fn test_unreachable_sources_find_nothing() {
    let catalog = TempDir::new().unwrap();
    let listing = FakeListing::new(&[]);

    let found = discover_new_skills(catalog.path(), &sources(), listing).await.unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_apply_checkout_reports_changes() {
    let checkout = TempDir::new().unwrap();
    write(checkout.path(), "agents/planner.md", "planner");
    write(checkout.path(), "agents/reviewer.md", "reviewer v2");
    write(checkout.path(), "README.md", "readme v2");
    write(checkout.path(), "CONTRIBUTING.md", "same");

    let catalog = TempDir::new().unwrap();
    let local = catalog.path().join("mirror");
    write(&local, "agents/reviewer.md", "reviewer v1");
    write(&local, "agents/removed.md", "gone upstream");
    write(&local, "README.md", "readme v1");
    write(&local, "CONTRIBUTING.md", "same");

    let mirror = RepoMirror {
        repo: "owner/mirror".into(),
        local_dir: "mirror".into(),
        dirs: vec!["agents".into(), "hooks".into()],
        files: vec!["README.md".into(), "CONTRIBUTING.md".into()],
        url: None,
    };

    let changes = apply_checkout(checkout.path(), &mirror, &local).unwrap();
    assert_eq!(changes, vec!["agents/planner.md", "README.md"]);

    assert_eq!(fs::read_to_string(local.join("agents/reviewer.md")).unwrap(), "reviewer v2");
    assert!(!local.join("agents/removed.md").exists());
    assert_eq!(fs::read_to_string(local.join("README.md")).unwrap(), "readme v2");
}

#[tokio::test]
async fn test_clone_failure_is_reported_not_raised() {
    let catalog = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let mirror = RepoMirror {
        repo: "owner/missing".into(),
        local_dir: "mirror".into(),
        dirs: vec!["agents".into()],
        files: vec![],
        url: Some(work.path().join("no-such-repo").to_string_lossy().into_owned()),
    };

    let result = mirror_repo(&mirror, catalog.path(), work.path(), Duration::from_secs(30)).await;
    assert_eq!(result.status, MirrorStatus::Failed);
    assert!(result.changes.is_empty());
    assert!(!catalog.path().join("mirror/agents").exists());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(
        serde_json::to_value(MirrorStatus::Synced).unwrap(),
        serde_json::json!("synced")
    );
}

#[tokio::test]
async fn test_run_and_save_report() {
    let catalog = TempDir::new().unwrap();
    let sync = CatalogSync::new(catalog.path())
        .with_mirrors(vec![])
        .with_sources(sources());
    let listing = FakeListing::new(&[("anthropics/skills", &["pdf"])]);

    let report = sync.run(listing).await.unwrap();
    assert_eq!(report.total_changes(), 1);

    report.save(&sync.report_path()).unwrap();
    let saved: SyncReport =
        serde_json::from_str(&fs::read_to_string(sync.report_path()).unwrap()).unwrap();
    assert_eq!(saved.new_skills, report.new_skills);
    assert!(saved.synced_repos.is_empty());
}

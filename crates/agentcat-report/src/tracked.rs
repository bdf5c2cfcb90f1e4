//! Reports across every tracked project under a root directory

use crate::render::{heavy_rule, render_markdown, render_text, ReportFormat};
use crate::ProjectReport;
use agentcat_deploy::ProjectStateStore;
use agentcat_types::{CatalogError, Result};
use chrono::NaiveDateTime;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Immediate children of `root` holding a project-state record, by name
pub fn find_tracked_projects(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(CatalogError::fs(root))?;

    let mut projects: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .filter(|p| ProjectStateStore::for_project(p).path().is_file())
        .collect();
    projects.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    debug!("Found {} tracked projects under {:?}", projects.len(), root);
    Ok(projects)
}

/// Combined report for every tracked project
pub fn render_all(root: &Path, days: u32, format: ReportFormat, now: NaiveDateTime) -> Result<String> {
    let projects = find_tracked_projects(root)?;

    let mut reports = Vec::with_capacity(projects.len());
    for project in &projects {
        match ProjectReport::build(project, days, now) {
            Ok(report) => reports.push(report),
            Err(e) => warn!("Skipping report for {:?}: {}", project, e),
        }
    }

    if format == ReportFormat::Json {
        return Ok(serde_json::to_string_pretty(&reports)?);
    }

    if reports.is_empty() {
        return Ok("No tracked projects found.".to_string());
    }

    let rule = heavy_rule();
    let mut sections = vec![
        format!("\n{rule}"),
        "  AGENT CATALOG - WEEKLY REPORT".to_string(),
        format!("  Generated: {}", now.format("%Y-%m-%d %H:%M")),
        format!("  Projects tracked: {}", reports.len()),
        format!("{rule}\n"),
    ];

    for report in &reports {
        sections.push(match format {
            ReportFormat::Markdown => render_markdown(report),
            _ => render_text(report),
        });
        sections.push(String::new());
    }

    Ok(sections.join("\n"))
}

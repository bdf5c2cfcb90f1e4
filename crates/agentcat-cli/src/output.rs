//! Terminal output for command results

use agentcat_deploy::{DeploymentResult, DISPATCHER_NAME};
use agentcat_profiler::Recommendation;
use agentcat_types::{Profile, CONFIG_DIR};
use std::collections::BTreeMap;
use std::path::Path;

fn rule(ch: char) -> String {
    ch.to_string().repeat(60)
}

fn flag(value: bool) -> &'static str {
    if value {
        "✅"
    } else {
        "❌"
    }
}

fn joined<'a>(items: impl IntoIterator<Item = &'a String>, empty: &str) -> String {
    let items: Vec<&str> = items.into_iter().map(String::as_str).collect();
    if items.is_empty() {
        empty.to_string()
    } else {
        items.join(", ")
    }
}

pub fn recommendation(rec: &Recommendation) -> String {
    let analysis = &rec.analysis;
    let structure = &analysis.structure;
    let mut lines = vec![
        String::new(),
        rule('='),
        format!("  PROJECT ANALYSIS: {}", rec.name),
        rule('='),
        format!("\nPath: {}", rec.project),
        format!("\nTech Stack: {}", joined(&analysis.tech_stack, "Unknown")),
        format!("Frameworks: {}", joined(&analysis.frameworks, "None detected")),
        format!("Indicators: {}", joined(analysis.indicators.iter().take(5), "None")),
        "\nStructure:".to_string(),
        format!("   Has API: {}", flag(structure.has_api)),
        format!("   Has Tests: {}", flag(structure.has_tests)),
        format!("   Has Docker: {}", flag(structure.has_docker)),
        format!("   Has Database: {}", flag(structure.has_db)),
        "\nPROFILE RECOMMENDATIONS:".to_string(),
        rule('─'),
    ];

    if rec.profile_matches.is_empty() {
        lines.push("   No matching profiles found".to_string());
    }
    for (index, m) in rec.profile_matches.iter().enumerate() {
        let marker = if index == 0 { "→" } else { " " };
        lines.push(format!(
            " {marker} {:20} {:3}% - {}",
            m.profile_name,
            m.score,
            m.reasons.join(", ")
        ));
    }

    if let Some(primary) = &rec.primary_profile {
        lines.push(format!("\nRecommended Profile: {} ({}% match)", primary, rec.confidence));
        lines.push("\nAgents to deploy:".to_string());
        lines.extend(rec.recommended_agents.iter().map(|a| format!("   • {a}")));
        lines.push("\nSkills to deploy:".to_string());
        lines.extend(rec.recommended_skills.iter().map(|s| format!("   • {s}")));
        lines.push(format!("\n{}", rule('=')));
        lines.push(format!("To deploy: agentcat deploy {} --profile {}", rec.project, primary));
    }
    lines.push(format!("{}\n", rule('=')));

    lines.join("\n")
}

pub fn deployment(result: &DeploymentResult, project_root: &Path) -> String {
    let mut lines = vec![
        String::new(),
        rule('='),
        format!("  DEPLOYING: {} → {}", result.profile_name, result.project_name),
        rule('='),
        "\nAgents:".to_string(),
    ];

    lines.extend(result.agents.deployed.iter().map(|a| format!("   ✅ {a}")));
    lines.extend(
        result
            .agents
            .skipped
            .iter()
            .map(|a| format!("   ⏭️  {a} (exists, use --force to overwrite)")),
    );

    lines.push("\nSkills:".to_string());
    lines.extend(result.skills.deployed.iter().map(|s| format!("   ✅ {s}")));
    lines.extend(
        result
            .skills
            .skipped
            .iter()
            .map(|s| format!("   ⏭️  {s} (exists, use --force to overwrite)")),
    );

    if !result.warnings.is_empty() {
        lines.push("\nWarnings:".to_string());
        lines.extend(result.warnings.iter().map(|w| format!("   ⚠️  {w}")));
    }

    lines.push(format!("\nGenerated {DISPATCHER_NAME}.md"));
    lines.push(String::new());
    lines.push(rule('='));
    lines.push("  DEPLOYMENT COMPLETE".to_string());
    lines.push(rule('='));
    lines.push(format!("\n   Profile: {}", result.profile_name));
    lines.push(format!("   Agents:  {}", result.agents.present().len()));
    lines.push(format!("   Skills:  {}", result.skills.present().len()));
    lines.push(format!("\n   Location: {}", project_root.join(CONFIG_DIR).display()));
    lines.push(format!("{}\n", rule('=')));

    lines.join("\n")
}

pub fn listing(profiles: &BTreeMap<String, Profile>, agents: &BTreeMap<String, Vec<String>>) -> String {
    let mut lines = vec![String::new(), rule('='), "  AVAILABLE PROFILES".to_string(), rule('=')];

    if profiles.is_empty() {
        lines.push("   (none)".to_string());
    }
    for profile in profiles.values() {
        lines.push(format!("\n   {}", profile.name));
        if !profile.description.is_empty() {
            lines.push(format!("      {}", profile.description));
        }
        lines.push(format!(
            "      {} agents, {} skills",
            profile.all_agents().len(),
            profile.skills.len()
        ));
    }

    lines.push(String::new());
    lines.push(rule('='));
    lines.push("  CURATED AGENTS".to_string());
    lines.push(rule('='));

    if agents.is_empty() {
        lines.push("   (none)".to_string());
    }
    for (category, names) in agents {
        lines.push(format!("\n   {category}/"));
        lines.extend(names.iter().map(|n| format!("      {n}")));
    }
    lines.push(String::new());

    lines.join("\n")
}

//! The generated `agent-organizer` dispatcher document

use agentcat_types::Profile;
use std::collections::BTreeMap;

/// Name of the generated dispatcher agent
pub const DISPATCHER_NAME: &str = "agent-organizer";

const DEFAULT_CONTEXT: &str = "General development project.";
const DEFAULT_RULES: [&str; 2] = [
    "Follow project conventions",
    "Verify work with tests when possible",
];

const STOCK_DESCRIPTIONS: &[(&str, &str)] = &[
    ("python-pro", "Python code, refactoring, debugging, new features"),
    ("backend-architect", "API design, architecture decisions, system design"),
    ("database-optimizer", "SQL queries, schema design, performance tuning"),
    ("security-auditor", "Security review, vulnerability detection"),
    ("code-reviewer", "Code quality, best practices, review"),
    ("test-automator", "Writing tests, test coverage, TDD"),
    ("ai-engineer", "LLM integration, prompts, AI pipelines"),
    ("prompt-engineer", "Prompt optimization, token efficiency"),
    ("nextjs-pro", "Next.js features, React patterns, App Router"),
    ("react-pro", "React components, hooks, state management"),
    ("typescript-pro", "TypeScript types, generics, strict mode"),
    ("fintech-security", "Financial security, trading safety, API key protection"),
];

const DISPATCH_PROTOCOL: &str = r#"## Dispatch Protocol

1. **Analyze** the user's request to understand the domain and complexity
2. **Select** the most appropriate agent(s) for the task
3. **Plan** for complex tasks requiring multiple agents
4. **Delegate** using: "Use <agent-name> to <specific task>"
5. **Coordinate** results from multiple agents if needed

"#;

const EXAMPLES: &str = r#"**User**: "Add rate limiting to the API"
**Action**: Use backend-architect to design the approach, then python-pro to implement

**User**: "Why is this query slow?"
**Action**: Use database-optimizer to analyze and suggest improvements

**User**: "Review my changes before I commit"
**Action**: Use code-reviewer for quality, security-auditor for security concerns
"#;

/// One-line selection hints per agent name
#[derive(Debug, Clone)]
pub struct AgentDescriptions {
    entries: BTreeMap<String, String>,
}

impl Default for AgentDescriptions {
    fn default() -> Self {
        Self {
            entries: STOCK_DESCRIPTIONS
                .iter()
                .map(|(name, desc)| (name.to_string(), desc.to_string()))
                .collect(),
        }
    }
}

impl AgentDescriptions {
    /// A table without stock entries
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with(mut self, agent: impl Into<String>, description: impl Into<String>) -> Self {
        self.entries.insert(agent.into(), description.into());
        self
    }

    /// Known description, or `<Title Case> tasks`
    pub fn describe(&self, agent: &str) -> String {
        self.entries
            .get(agent)
            .cloned()
            .unwrap_or_else(|| format!("{} tasks", title_case(agent)))
    }
}

/// `backend-architect` -> `Backend Architect`
///
/// Hyphens become spaces. A letter is upper-cased when it follows a
/// non-letter and lower-cased otherwise, so `e2e-tester` -> `E2E Tester`.
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut after_letter = false;

    for c in name.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }

    out
}

/// Render the dispatcher for `agents`, the agents present in the project
pub fn render_dispatcher(
    project_name: &str,
    profile: &Profile,
    agents: &[String],
    descriptions: &AgentDescriptions,
) -> String {
    let context = profile
        .organizer_context
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CONTEXT);

    let mut doc = format!(
        "---\n\
         name: {DISPATCHER_NAME}\n\
         description: Master orchestrator for {project_name}. Analyzes requests and delegates to specialist agents.\n\
         tools: Read, Glob, Grep, Bash, TodoWrite\n\
         model: sonnet\n\
         ---\n\n\
         # Agent Organizer for {project_name}\n\n\
         **Role**: Analyze incoming requests and delegate to the most appropriate specialist agent.\n\n\
         ## Project Context\n\n\
         {context}\n\n"
    );

    doc.push_str("## Available Agents\n\n| Agent | Expertise |\n|-------|-----------|\n");
    for agent in agents {
        doc.push_str(&format!("| **{agent}** | {} |\n", title_case(agent)));
    }
    doc.push('\n');

    doc.push_str(DISPATCH_PROTOCOL);

    doc.push_str("## Agent Selection Guide\n\n");
    for agent in agents {
        doc.push_str(&format!("- **{agent}**: {}\n", descriptions.describe(agent)));
    }
    doc.push('\n');

    doc.push_str("## Rules\n\n");
    let rules: Vec<&str> = if profile.rules.is_empty() {
        DEFAULT_RULES.to_vec()
    } else {
        profile.rules.iter().map(String::as_str).collect()
    };
    for rule in rules {
        doc.push_str(&format!("- {rule}\n"));
    }
    doc.push('\n');

    doc.push_str("## Examples\n\n");
    doc.push_str(EXAMPLES);

    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentcat_types::AgentSet;

    fn profile(rules: Vec<String>, context: Option<String>) -> Profile {
        Profile {
            name: "python-backend".into(),
            description: String::new(),
            tech_patterns: Default::default(),
            agents: AgentSet {
                core: vec!["python-pro".into()],
                optional: vec![],
            },
            skills: vec![],
            rules,
            organizer_context: context,
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("backend-architect"), "Backend Architect");
        assert_eq!(title_case("ai-engineer"), "Ai Engineer");
        assert_eq!(title_case("solo"), "Solo");
        assert_eq!(title_case("e2e-tester"), "E2E Tester");
        assert_eq!(title_case("data_scientist"), "Data_Scientist");
        assert_eq!(title_case("SQL-pro"), "Sql Pro");
    }

    #[test]
    fn test_describe_fallback() {
        let descriptions = AgentDescriptions::default();
        assert_eq!(
            descriptions.describe("python-pro"),
            "Python code, refactoring, debugging, new features"
        );
        assert_eq!(descriptions.describe("rust-pro"), "Rust Pro tasks");
        assert_eq!(
            AgentDescriptions::empty().with("rust-pro", "Crates").describe("rust-pro"),
            "Crates"
        );
    }

    #[test]
    fn test_default_context_and_rules() {
        let doc = render_dispatcher(
            "shop",
            &profile(vec![], None),
            &["python-pro".to_string()],
            &AgentDescriptions::default(),
        );

        assert!(doc.starts_with("---\nname: agent-organizer\n"));
        assert!(doc.contains("# Agent Organizer for shop"));
        assert!(doc.contains("General development project."));
        assert!(doc.contains("| **python-pro** | Python Pro |"));
        assert!(doc.contains("- Follow project conventions\n- Verify work with tests when possible"));
        assert!(doc.contains("model: sonnet\n---\n\n# Agent Organizer"));
        assert!(doc.contains("## Project Context\n\nGeneral development project.\n\n## Available Agents"));
        assert!(doc.contains("needed\n\n## Agent Selection Guide\n\n- **python-pro**:"));
        assert!(doc.ends_with("security-auditor for security concerns\n"));
    }

    #[test]
    fn test_profile_context_and_rules() {
        let doc = render_dispatcher(
            "shop",
            &profile(vec!["Type hints everywhere".into()], Some("A FastAPI shop.".into())),
            &["python-pro".to_string(), "rust-pro".to_string()],
            &AgentDescriptions::default(),
        );

        assert!(doc.contains("A FastAPI shop."));
        assert!(doc.contains("- Type hints everywhere"));
        assert!(!doc.contains("Follow project conventions"));
        assert!(doc.contains("- **rust-pro**: Rust Pro tasks"));
    }
}

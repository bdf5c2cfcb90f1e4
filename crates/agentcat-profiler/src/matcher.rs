//! Profile scoring and ranking

use crate::policy::ScoringPolicy;
use agentcat_types::{Profile, ProfileMatch, ProjectAnalysis};
use tracing::debug;

/// Scores profiles against an analyzed project
#[derive(Debug, Clone, Default)]
pub struct ProfileMatcher {
    policy: ScoringPolicy,
}

impl ProfileMatcher {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score one profile. Contributions are summed, then clamped.
    pub fn score(&self, analysis: &ProjectAnalysis, profile: &Profile) -> ProfileMatch {
        let mut score: u32 = 0;
        let mut reasons = Vec::new();

        let wanted = profile.indicator_set();

        let overlap: Vec<&str> = analysis
            .indicators
            .intersection(&wanted)
            .map(String::as_str)
            .collect();
        if !overlap.is_empty() {
            score = score.saturating_add(self.policy.indicator_points.saturating_mul(count(overlap.len())));
            reasons.push(format!("indicators: {}", overlap.join(", ")));
        }

        let literal_deps = wanted
            .iter()
            .filter(|i| analysis.dependencies.contains(*i))
            .count();
        score = score.saturating_add(self.policy.dependency_points.saturating_mul(count(literal_deps)));

        if let Some((points, reason)) = self
            .policy
            .bonus_for(&profile.name)
            .and_then(|rule| rule.apply(analysis))
        {
            score = score.saturating_add(points);
            reasons.push(reason);
        }

        ProfileMatch {
            profile_name: profile.name.clone(),
            score: score.min(self.policy.max_score),
            reasons,
        }
    }

    /// Score every profile, keep positive scores, best first
    ///
    /// The sort is stable: equal scores keep the order `profiles` yields.
    pub fn match_profiles<'a, I>(&self, analysis: &ProjectAnalysis, profiles: I) -> Vec<ProfileMatch>
    where
        I: IntoIterator<Item = &'a Profile>,
    {
        let mut matches: Vec<ProfileMatch> = profiles
            .into_iter()
            .map(|profile| self.score(analysis, profile))
            .filter(|m| m.score > 0)
            .collect();

        matches.sort_by(|a, b| b.score.cmp(&a.score));

        debug!("{} profiles matched", matches.len());
        matches
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentcat_types::{AgentSet, TechPatterns};

    fn profile(name: &str, indicators: &[&str]) -> Profile {
        Profile {
            name: name.to_string(),
            description: String::new(),
            tech_patterns: TechPatterns {
                required_any: vec![],
                indicators: indicators.iter().map(|s| s.to_string()).collect(),
            },
            agents: AgentSet::default(),
            skills: vec![],
            rules: vec![],
            organizer_context: None,
        }
    }

    fn analysis(indicators: &[&str], deps: &[&str]) -> ProjectAnalysis {
        let mut a = ProjectAnalysis::default();
        a.indicators = indicators.iter().map(|s| s.to_string()).collect();
        a.dependencies = deps.iter().map(|s| s.to_string()).collect();
        a
    }

    #[test]
    fn test_overlap_and_dependency_points() {
        let matcher = ProfileMatcher::default();
        let p = profile("data", &["sqlalchemy", "postgresql", "redis"]);
        let a = analysis(&["sqlalchemy", "postgresql"], &["sqlalchemy"]);

        let m = matcher.score(&a, &p);
        assert_eq!(m.score, 20 * 2 + 15);
        assert_eq!(m.reasons, vec!["indicators: postgresql, sqlalchemy"]);
    }

    #[test]
    fn test_score_clamped() {
        let matcher = ProfileMatcher::default();
        let p = profile("trading-fintech", &["kalshi", "polymarket", "crypto", "trading"]);
        let a = analysis(
            &["kalshi", "polymarket", "crypto", "trading"],
            &["kalshi", "polymarket"],
        );

        let m = matcher.score(&a, &p);
        assert_eq!(m.score, 100);
        assert_eq!(m.reasons.len(), 2);
        assert!(m.reasons[1].starts_with("trading: "));
    }

    #[test]
    fn test_scoring_is_monotonic_in_indicators() {
        let matcher = ProfileMatcher::default();
        let p = profile("ai-ml", &["openai", "anthropic", "langchain"]);

        let mut previous = 0;
        let mut found: Vec<&str> = Vec::new();
        for indicator in ["openai", "anthropic", "langchain"] {
            found.push(indicator);
            let score = matcher.score(&analysis(&found, &[]), &p).score;
            assert!(score >= previous);
            previous = score;
        }
        assert_eq!(previous, 100);
    }

    #[test]
    fn test_zero_scores_filtered_and_ties_stable() {
        let matcher = ProfileMatcher::default();
        let profiles = vec![
            profile("first", &["discord"]),
            profile("nothing", &["mongodb"]),
            profile("best", &["discord", "telegram"]),
            profile("second", &["telegram"]),
        ];
        let a = analysis(&["discord", "telegram"], &[]);

        let names: Vec<String> = matcher
            .match_profiles(&a, &profiles)
            .into_iter()
            .map(|m| m.profile_name)
            .collect();
        assert_eq!(names, vec!["best", "first", "second"]);
    }

    #[test]
    fn test_no_profiles() {
        let matcher = ProfileMatcher::default();
        assert!(matcher
            .match_profiles(&ProjectAnalysis::default(), &Vec::new())
            .is_empty());
    }
}

//! The four sub-scorers.
//!
//! Each scorer is a pure function of the scoring context and returns a value
//! within `0..=component.max()`.

use super::corpus::RoleProfile;
use super::patterns::DIGIT;
use super::sections::{SectionMap, SectionName};
use crate::models::score::ScoreComponent;

/// Relevance reported for a role without a profile.
pub const UNKNOWN_ROLE_RELEVANCE: f64 = 12.0;
/// Skill depth reported for a role without a profile.
pub const UNKNOWN_ROLE_DEPTH: f64 = 10.0;

/// Verbs signalling ownership and impact, matched as substrings.
pub const DEPTH_VERBS: &[&str] = &[
    "architected",
    "designed",
    "optimized",
    "implemented",
    "developed",
    "built",
    "created",
    "engineered",
    "deployed",
    "improved",
    "enhanced",
    "led",
    "managed",
    "spearheaded",
    "initiated",
    "established",
];

/// Action verbs counted by the format scorer, matched as substrings.
pub const ACTION_VERBS: &[&str] = &[
    "led", "managed", "increased", "improved", "reduced", "created", "launched",
];

/// Inputs shared by all sub-scorers for one analysis.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Extracted text as is.
    pub text: &'a str,
    /// Lowercased extracted text.
    pub lower: &'a str,
    /// Sections found in `text`.
    pub sections: &'a SectionMap,
    /// Requested role.
    pub role: &'a str,
    /// Profile of the role, `None` for roles outside the corpus.
    pub profile: Option<&'a RoleProfile>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(
        text: &'a str,
        lower: &'a str,
        sections: &'a SectionMap,
        role: &'a str,
        profile: Option<&'a RoleProfile>,
    ) -> Self {
        Self {
            text,
            lower,
            sections,
            role,
            profile,
        }
    }

    /// Character length of the full text.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One component of the score breakdown.
pub trait SubScorer: Send + Sync {
    /// Which breakdown field this scorer fills.
    fn component(&self) -> ScoreComponent;

    /// Score the context. Must be finite and within `0..=component().max()`.
    fn score(&self, ctx: &ScoringContext<'_>) -> f64;
}

/// Presence and length of the expected sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessScorer;

impl CompletenessScorer {
    const REQUIRED: [SectionName; 3] = [
        SectionName::Education,
        SectionName::Experience,
        SectionName::Skills,
    ];
    const OPTIONAL: [SectionName; 2] = [SectionName::Projects, SectionName::Certifications];
}

impl SubScorer for CompletenessScorer {
    fn component(&self) -> ScoreComponent {
        ScoreComponent::Completeness
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> f64 {
        let mut score: f64 = 0.0;

        for section in Self::REQUIRED {
            score += match ctx.sections.char_len(section) {
                len if len > 50 => 6.0,
                len if len > 20 => 3.0,
                _ => 1.0,
            };
        }

        for section in Self::OPTIONAL {
            if ctx.sections.char_len(section) > 30 {
                score += 3.0;
            }
        }

        score.min(self.component().max())
    }
}

/// Coverage and repetition of the role's keyword phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleRelevanceScorer;

impl SubScorer for RoleRelevanceScorer {
    fn component(&self) -> ScoreComponent {
        ScoreComponent::RoleRelevance
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> f64 {
        let Some(profile) = ctx.profile else {
            return UNKNOWN_ROLE_RELEVANCE;
        };

        let keywords = profile.keywords();
        let found: Vec<_> = keywords.iter().filter(|k| k.is_match(ctx.lower)).collect();
        let repeated = found.iter().filter(|k| k.count(ctx.lower) > 1).count();

        let score =
            10.0 + 25.0 * fraction(found.len(), keywords.len()) + (repeated as f64).min(5.0);
        score.min(self.component().max())
    }
}

/// Coverage of the role's skills plus impact verbs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkillDepthScorer;

impl SubScorer for SkillDepthScorer {
    fn component(&self) -> ScoreComponent {
        ScoreComponent::SkillDepth
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> f64 {
        let Some(profile) = ctx.profile else {
            return UNKNOWN_ROLE_DEPTH;
        };

        let skills = profile.skills();
        let found = skills.iter().filter(|s| s.is_match(ctx.lower)).count();
        let verbs = DEPTH_VERBS.iter().filter(|v| ctx.lower.contains(*v)).count();

        let score = 5.0 + 15.0 * fraction(found, skills.len()) + (verbs as f64 * 1.5).min(7.0);
        score.min(self.component().max())
    }
}

/// Structure, length, quantified results and action verbs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatQualityScorer;

impl SubScorer for FormatQualityScorer {
    fn component(&self) -> ScoreComponent {
        ScoreComponent::FormatQuality
    }

    fn score(&self, ctx: &ScoringContext<'_>) -> f64 {
        let mut score: f64 = 0.0;

        let substantial = ctx
            .sections
            .iter()
            .filter(|(_, text)| text.chars().count() > 50)
            .count();
        if substantial >= 3 {
            score += 5.0;
        }

        let len = ctx.text_len();
        for threshold in [500, 1000, 2000] {
            if len > threshold {
                score += 3.0;
            }
        }

        if DIGIT.is_match(ctx.text) {
            score += 3.0;
        }

        let verbs = ACTION_VERBS.iter().filter(|v| ctx.lower.contains(*v)).count();
        if verbs >= 3 {
            score += 3.0;
        }

        score.min(self.component().max())
    }
}

/// The standard scorer set, one per component.
pub fn default_scorers() -> Vec<std::sync::Arc<dyn SubScorer>> {
    vec![
        std::sync::Arc::new(CompletenessScorer),
        std::sync::Arc::new(RoleRelevanceScorer),
        std::sync::Arc::new(SkillDepthScorer),
        std::sync::Arc::new(FormatQualityScorer),
    ]
}

fn fraction(found: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        found as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::corpus::RoleCorpus;
    use pretty_assertions::assert_eq;

    fn score_with(scorer: &dyn SubScorer, text: &str, role: &str) -> f64 {
        let corpus = RoleCorpus::builtin();
        let lower = text.to_lowercase();
        let sections = SectionMap::segment(text);
        let ctx = ScoringContext::new(text, &lower, &sections, role, corpus.profile(role));
        scorer.score(&ctx)
    }

    #[test]
    fn test_empty_text_baselines() {
        assert_eq!(score_with(&CompletenessScorer, "", "Software Engineer"), 3.0);
        assert_eq!(score_with(&RoleRelevanceScorer, "", "Software Engineer"), 10.0);
        assert_eq!(score_with(&SkillDepthScorer, "", "Software Engineer"), 5.0);
        assert_eq!(score_with(&FormatQualityScorer, "", "Software Engineer"), 0.0);
    }

    #[test]
    fn test_unknown_role_constants() {
        let text = "Python developer who led and managed teams";
        assert_eq!(score_with(&RoleRelevanceScorer, text, "Consultant"), 12.0);
        assert_eq!(score_with(&SkillDepthScorer, text, "Consultant"), 10.0);
    }

    #[test]
    fn test_completeness_tiers() {
        // education > 50 chars, skills between 20 and 50, no experience, projects > 30
        let text = format!(
            "Education {}\nSkills: Rust and Go and SQL\nProjects {}",
            "x".repeat(60),
            "y".repeat(40)
        );
        assert_eq!(score_with(&CompletenessScorer, &text, "Consultant"), 6.0 + 1.0 + 3.0 + 3.0);
    }

    #[test]
    fn test_role_relevance_repeats() {
        // keywords found: sql, nosql; "sql" occurs twice as a whole word
        let text = "sql and nosql and sql";
        let expected = 10.0 + 25.0 * (2.0 / 27.0) + 1.0;
        assert_eq!(score_with(&RoleRelevanceScorer, text, "Software Engineer"), expected);
    }

    #[test]
    fn test_role_relevance_repeat_bonus_capped() {
        // six keywords, each written twice
        let keywords = "excel tableau etl regression forecast dashboard";
        let text = format!("{keywords} {keywords}");
        let expected = 10.0 + 25.0 * (6.0 / 21.0) + 5.0;
        assert!(expected < 30.0);
        assert_eq!(score_with(&RoleRelevanceScorer, &text, "Data Analyst"), expected);
    }

    #[test]
    fn test_skill_depth_verbs_capped() {
        let text = "architected designed optimized implemented developed built";
        assert_eq!(score_with(&SkillDepthScorer, text, "Product Manager"), 5.0 + 7.0);
    }

    #[test]
    fn test_format_quality() {
        let text = format!("Led, managed and increased revenue by 20% {}", "a".repeat(1000));
        assert_eq!(score_with(&FormatQualityScorer, &text, "Consultant"), 3.0 + 3.0 + 3.0 + 3.0);
    }

    #[test]
    fn test_scores_within_bounds() {
        let text = "Software engineer. ".repeat(200) + &SOFTWARE_HEAVY.repeat(5);
        for scorer in default_scorers() {
            let value = score_with(scorer.as_ref(), &text, "Software Engineer");
            assert!(value >= 0.0 && value <= scorer.component().max(), "{}", value);
        }
    }

    const SOFTWARE_HEAVY: &str = "Python Java C++ JavaScript TypeScript React Node.js SQL NoSQL \
        System Design Data Structures Algorithms OOP Git Docker Kubernetes CI/CD Testing \
        architected designed optimized implemented developed built created engineered \
        api rest backend frontend microservice web application code engineer 2024 ";
}

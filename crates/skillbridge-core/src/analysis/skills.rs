//! Skill detection: role skills, generic technical terms and free-text mentions.

use std::collections::HashSet;

use super::corpus::{RoleCorpus, RoleProfile};
use super::patterns::mention_patterns;
use crate::models::score::{MAX_MISSING_SKILLS, MAX_TECHNICAL_SKILLS};

/// Insertion-ordered, case-insensitively deduplicated skill names.
#[derive(Debug, Clone, Default)]
pub struct OrderedSkillSet {
    items: Vec<String>,
    seen: HashSet<String>,
}

impl OrderedSkillSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a skill unless an equal name (ignoring case) is already present.
    pub fn insert(&mut self, skill: impl Into<String>) -> bool {
        let skill = skill.into();
        if self.seen.insert(skill.to_lowercase()) {
            self.items.push(skill);
            true
        } else {
            false
        }
    }

    pub fn into_vec(self) -> Vec<String> {
        self.items
    }
}

/// Role skills found in `text` as whole words, in the profile's order.
pub fn matched_role_skills<'a>(profile: Option<&'a RoleProfile>, text: &str) -> Vec<&'a str> {
    profile
        .map(|p| {
            p.skills()
                .iter()
                .filter(|s| s.is_match(text))
                .map(|s| s.term())
                .collect()
        })
        .unwrap_or_default()
}

/// Role skills absent from `text`, in the profile's order, at most five.
pub fn missing_skills(profile: Option<&RoleProfile>, text: &str) -> Vec<String> {
    profile
        .map(|p| {
            p.skills()
                .iter()
                .filter(|s| !s.is_match(text))
                .take(MAX_MISSING_SKILLS)
                .map(|s| s.term().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Every technical skill detected in the lowercased text, at most 25.
///
/// Role skills come first in their curated casing, then generic terms
/// title-cased, then accepted "proficient in X" style mentions.
pub fn technical_skills(
    corpus: &RoleCorpus,
    profile: Option<&RoleProfile>,
    lower: &str,
) -> Vec<String> {
    let mut found = OrderedSkillSet::new();

    for skill in matched_role_skills(profile, lower) {
        found.insert(skill);
    }

    for term in corpus.generic_terms() {
        if term.is_match(lower) {
            found.insert(title_case(term.term()));
        }
    }

    for pattern in mention_patterns() {
        for caps in pattern.captures_iter(lower) {
            let Some(skill) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            let len = skill.chars().count();
            if !(2..20).contains(&len) {
                continue;
            }
            let known = corpus
                .generic_terms()
                .iter()
                .any(|term| term.term().contains(skill));
            if known {
                found.insert(capitalize(skill));
            }
        }
    }

    let mut skills = found.into_vec();
    skills.truncate(MAX_TECHNICAL_SKILLS);
    skills
}

/// Uppercase the first character of every space-separated word.
fn title_case(term: &str) -> String {
    term.split(' ').map(capitalize).collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn corpus() -> std::sync::Arc<RoleCorpus> {
        RoleCorpus::builtin()
    }

    #[test]
    fn test_ordered_set_ignores_case() {
        let mut set = OrderedSkillSet::new();
        assert!(set.insert("SQL"));
        assert!(!set.insert("Sql"));
        assert!(set.insert("Rust"));
        assert!(!set.insert("rust"));
        assert_eq!(set.into_vec(), vec!["SQL", "Rust"]);
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("spring boot"), "Spring Boot");
        assert_eq!(title_case("ci/cd"), "Ci/cd");
        assert_eq!(title_case("node.js"), "Node.js");
    }

    #[test]
    fn test_role_skills_before_generic_terms() {
        let corpus = corpus();
        let profile = corpus.profile("Software Engineer");
        let skills = technical_skills(&corpus, profile, "docker, python and redis; node.js");

        assert_eq!(skills, vec!["Python", "Node.js", "Docker", "Node", "Redis"]);
    }

    #[test]
    fn test_mentions_need_known_term() {
        let corpus = corpus();
        let skills = technical_skills(
            &corpus,
            None,
            "proficient in kube and experienced with baking. worked on flas",
        );
        assert_eq!(skills, vec!["Kube", "Flas"]);
    }

    #[test]
    fn test_technical_skills_capped() {
        let corpus = corpus();
        let text = corpus
            .generic_terms()
            .iter()
            .map(|t| t.term())
            .collect::<Vec<_>>()
            .join(" , ");
        let skills = technical_skills(&corpus, None, &text);
        assert_eq!(skills.len(), MAX_TECHNICAL_SKILLS);
        assert_eq!(skills[0], "Python");
    }

    #[test]
    fn test_missing_skills() {
        let corpus = corpus();
        let profile = corpus.profile("Software Engineer");
        assert_eq!(
            missing_skills(profile, "Python, C++ and JavaScript"),
            vec!["Java", "TypeScript", "React", "Node.js", "SQL"]
        );
        assert!(missing_skills(None, "").is_empty());
    }

    #[test]
    fn test_found_skill_never_missing() {
        let corpus = corpus();
        let profile = corpus.profile("Software Engineer");
        let text = "c++ ci/cd rest api";
        let found = matched_role_skills(profile, text);
        assert_eq!(found, vec!["C++", "CI/CD", "REST API"]);
        for skill in missing_skills(profile, text) {
            assert!(!found.contains(&skill.as_str()));
        }
    }
}

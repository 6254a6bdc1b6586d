//! Display-ready strengths derived from matched skills and section signals.

use super::sections::{SectionMap, SectionName};
use crate::models::score::{MAX_STRENGTHS, Strength, StrengthIcon};

/// Words signalling leadership, matched as substrings.
pub const LEADERSHIP_WORDS: &[&str] = &["led", "managed", "launched", "increased", "improved", "directed"];

/// Pick up to four strengths.
///
/// `role_skills` are the role skills found in the text, or `None` when the role
/// has no profile. `technical_skills` is the full detected skill list, used
/// when a profiled role matched none of its skills.
pub fn identify_strengths(
    role_skills: Option<&[&str]>,
    technical_skills: &[String],
    sections: &SectionMap,
    lower: &str,
) -> Vec<Strength> {
    let mut strengths: Vec<Strength> = role_skills
        .unwrap_or_default()
        .iter()
        .take(MAX_STRENGTHS)
        .map(|skill| Strength::new(*skill, StrengthIcon::Code))
        .collect();

    if role_skills.is_some_and(|skills| skills.is_empty()) {
        strengths.extend(
            technical_skills
                .iter()
                .take(MAX_STRENGTHS)
                .map(|skill| Strength::new(skill.as_str(), StrengthIcon::Code)),
        );
    }

    let signals = [
        (
            sections.char_len(SectionName::Education) > 80,
            "Strong Academic Background",
            StrengthIcon::Graduation,
        ),
        (
            sections.char_len(SectionName::Experience) > 200,
            "Solid Work Experience",
            StrengthIcon::Briefcase,
        ),
        (
            sections.char_len(SectionName::Projects) > 50,
            "Notable Projects",
            StrengthIcon::Briefcase,
        ),
        (
            LEADERSHIP_WORDS.iter().filter(|w| lower.contains(*w)).count() >= 2,
            "Leadership Experience",
            StrengthIcon::Star,
        ),
    ];

    for (present, label, icon) in signals {
        if present && strengths.len() < MAX_STRENGTHS {
            strengths.push(Strength::new(label, icon));
        }
    }

    if strengths.is_empty() {
        strengths.push(Strength::new("Well-Structured Resume", StrengthIcon::Briefcase));
    }

    strengths.truncate(MAX_STRENGTHS);
    strengths
}

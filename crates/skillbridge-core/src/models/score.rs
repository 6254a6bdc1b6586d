//! Score result returned to the presentation collaborator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest score a successful analysis can report.
pub const MIN_SCORE: f64 = 35.0;
/// Highest score.
pub const MAX_SCORE: f64 = 100.0;
/// Maximum number of strengths.
pub const MAX_STRENGTHS: usize = 4;
/// Maximum number of missing skills.
pub const MAX_MISSING_SKILLS: usize = 5;
/// Maximum number of detected technical skills.
pub const MAX_TECHNICAL_SKILLS: usize = 25;

/// Final result of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeScore {
    /// Overall score, 35..=100.
    pub score: u8,

    /// Display-ready positive signals, 1..=4.
    pub strengths: Vec<Strength>,

    /// Role skills not found in the text, 0..=5.
    pub missing_skills: Vec<String>,

    /// Detected technical skills in insertion order, 0..=25.
    pub technical_skills: Vec<String>,

    /// The four sub-scores.
    pub breakdown: ScoreBreakdown,
}

/// A strength entry paired with a symbolic icon key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strength {
    pub label: String,
    pub icon: StrengthIcon,
}

/// Icon key resolved to a glyph by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthIcon {
    Code,
    Briefcase,
    Graduation,
    Star,
}

/// The four independent sub-scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    /// 0..=25
    pub completeness: f64,
    /// 0..=30
    pub role_relevance: f64,
    /// 0..=25
    pub skill_depth: f64,
    /// 0..=20
    pub format_quality: f64,
}

/// Identifies one sub-score of the breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreComponent {
    Completeness,
    RoleRelevance,
    SkillDepth,
    FormatQuality,
}

impl ScoreComponent {
    /// All components in breakdown order.
    pub const ALL: [ScoreComponent; 4] = [
        ScoreComponent::Completeness,
        ScoreComponent::RoleRelevance,
        ScoreComponent::SkillDepth,
        ScoreComponent::FormatQuality,
    ];

    /// Upper bound of the component's range.
    pub fn max(self) -> f64 {
        match self {
            ScoreComponent::Completeness => 25.0,
            ScoreComponent::RoleRelevance => 30.0,
            ScoreComponent::SkillDepth => 25.0,
            ScoreComponent::FormatQuality => 20.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreComponent::Completeness => "completeness",
            ScoreComponent::RoleRelevance => "roleRelevance",
            ScoreComponent::SkillDepth => "skillDepth",
            ScoreComponent::FormatQuality => "formatQuality",
        }
    }
}

impl StrengthIcon {
    pub fn as_str(self) -> &'static str {
        match self {
            StrengthIcon::Code => "code",
            StrengthIcon::Briefcase => "briefcase",
            StrengthIcon::Graduation => "graduation",
            StrengthIcon::Star => "star",
        }
    }
}

impl fmt::Display for StrengthIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScoreBreakdown {
    /// Breakdown reported with the fallback result. Sums to 65.
    pub const FALLBACK: ScoreBreakdown = ScoreBreakdown {
        completeness: 15.0,
        role_relevance: 15.0,
        skill_depth: 20.0,
        format_quality: 15.0,
    };

    /// Unclamped sum of the four sub-scores.
    pub fn total(&self) -> f64 {
        self.completeness + self.role_relevance + self.skill_depth + self.format_quality
    }

    pub fn get(&self, component: ScoreComponent) -> f64 {
        match component {
            ScoreComponent::Completeness => self.completeness,
            ScoreComponent::RoleRelevance => self.role_relevance,
            ScoreComponent::SkillDepth => self.skill_depth,
            ScoreComponent::FormatQuality => self.format_quality,
        }
    }

    pub fn set(&mut self, component: ScoreComponent, value: f64) {
        match component {
            ScoreComponent::Completeness => self.completeness = value,
            ScoreComponent::RoleRelevance => self.role_relevance = value,
            ScoreComponent::SkillDepth => self.skill_depth = value,
            ScoreComponent::FormatQuality => self.format_quality = value,
        }
    }

    /// Overall score: the sum clamped to 35..=100 and rounded.
    pub fn overall(&self) -> u8 {
        self.total().clamp(MIN_SCORE, MAX_SCORE).round() as u8
    }
}

impl Default for ScoreBreakdown {
    fn default() -> Self {
        Self {
            completeness: 0.0,
            role_relevance: 0.0,
            skill_depth: 0.0,
            format_quality: 0.0,
        }
    }
}

impl Strength {
    pub fn new(label: impl Into<String>, icon: StrengthIcon) -> Self {
        Self {
            label: label.into(),
            icon,
        }
    }
}

impl ResumeScore {
    /// Fixed result substituted for any unrecoverable analysis fault.
    pub fn fallback() -> Self {
        Self {
            score: 65,
            strengths: vec![Strength::new("Valid Resume", StrengthIcon::Briefcase)],
            missing_skills: Vec::new(),
            technical_skills: Vec::new(),
            breakdown: ScoreBreakdown::FALLBACK,
        }
    }

    /// Check the structural invariants and return a list of violations.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(MIN_SCORE..=MAX_SCORE).contains(&f64::from(self.score)) {
            issues.push(format!("score {} outside 35..=100", self.score));
        }
        if self.strengths.is_empty() || self.strengths.len() > MAX_STRENGTHS {
            issues.push(format!("{} strengths, expected 1..=4", self.strengths.len()));
        }
        if self.missing_skills.len() > MAX_MISSING_SKILLS {
            issues.push(format!(
                "{} missing skills, expected at most 5",
                self.missing_skills.len()
            ));
        }
        if self.technical_skills.len() > MAX_TECHNICAL_SKILLS {
            issues.push(format!(
                "{} technical skills, expected at most 25",
                self.technical_skills.len()
            ));
        }
        for component in ScoreComponent::ALL {
            let value = self.breakdown.get(component);
            if !value.is_finite() || value < 0.0 || value > component.max() {
                issues.push(format!("{component} {value} outside 0..={}", component.max()));
            }
        }

        issues
    }
}

//! Resume analysis: section segmentation, role corpus, sub-scorers, skill
//! matching, strengths and the aggregating analyzer.

mod analyzer;
pub mod corpus;
pub mod patterns;
pub mod scorers;
pub mod sections;
pub mod skills;
pub mod strengths;

pub use analyzer::{AnalysisReport, ResumeAnalyzer};
pub use corpus::{RoleCorpus, RoleProfile};
pub use scorers::{
    CompletenessScorer, FormatQualityScorer, RoleRelevanceScorer, ScoringContext,
    SkillDepthScorer, SubScorer,
};
pub use sections::{SectionMap, SectionName};

pub use crate::models::score::ScoreComponent;

/// Roles offered to the user. Only some have a built-in profile.
pub const ROLE_MENU: [&str; 10] = [
    "Software Engineer",
    "Data Analyst",
    "Product Manager",
    "ML Engineer",
    "Backend Engineer",
    "Frontend Engineer",
    "DevOps Engineer",
    "QA Engineer",
    "Business Analyst",
    "Consultant",
];

/// Academic year choices. Informational only.
pub const ACADEMIC_YEARS: [&str; 5] = ["1", "2", "3", "4", "5 – Dual"];

/// Branch choices. Informational only.
pub const BRANCHES: [&str; 9] = [
    "CSE", "ECE", "EE", "ME", "CE", "CHE", "BIO", "MSc Eco", "MSc Math",
];

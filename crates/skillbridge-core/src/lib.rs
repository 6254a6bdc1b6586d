//! Core library for resume scoring.
//!
//! This crate provides:
//! - Document text extraction (plain text, PDF with layout-aware line breaks, DOCX)
//! - Resume section segmentation by header keywords
//! - Role-aware skill and keyword matching against a static role corpus
//! - A four-factor scoring model producing a 0-100 rating with strengths and gaps

pub mod analysis;
pub mod error;
pub mod extract;
pub mod models;
pub mod timing;

pub use analysis::{
    AnalysisReport, ResumeAnalyzer, RoleCorpus, RoleProfile, ScoreComponent, ScoringContext,
    SectionMap, SectionName, SubScorer,
};
pub use error::{AnalysisError, ExtractionError, Result, SkillbridgeError};
pub use extract::{DocumentTextExtractor, TextExtractor};
pub use models::config::SkillbridgeConfig;
pub use models::document::{AnalysisRequest, Document, MediaKind};
pub use models::score::{ResumeScore, ScoreBreakdown, Strength, StrengthIcon};

//! Error types for the skillbridge-core library.

use thiserror::Error;

use crate::models::score::ScoreComponent;

/// Main error type for the skillbridge library.
#[derive(Error, Debug)]
pub enum SkillbridgeError {
    /// Text extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Scoring pipeline error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by individual extraction strategies.
///
/// These never reach callers of [`crate::extract::TextExtractor::extract`];
/// the strategy chain logs them and falls through.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    PdfParse(String),

    /// Failed to decode a page content stream.
    #[error("failed to decode content of page {page}: {reason}")]
    PageContent { page: u32, reason: String },

    /// The PDF is encrypted with a non-empty password.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The DOCX container could not be read.
    #[error("failed to read DOCX container: {0}")]
    Docx(String),

    /// Extracted text was rejected by a strategy.
    #[error("text rejected: {0}")]
    Rejected(String),
}

/// Faults inside the scoring pipeline. Caught by the analyzer's failure boundary.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A sub-scorer returned a value outside its declared range.
    #[error("{component} score {value} outside 0..={max}")]
    ScoreOutOfRange {
        component: ScoreComponent,
        value: f64,
        max: f64,
    },

    /// The assembled result violates a structural invariant.
    #[error("malformed result: {}", .0.join("; "))]
    Malformed(Vec<String>),

    /// A pipeline stage panicked.
    #[error("analysis panicked: {0}")]
    Panicked(String),
}

/// Result type for the skillbridge library.
pub type Result<T> = std::result::Result<T, SkillbridgeError>;

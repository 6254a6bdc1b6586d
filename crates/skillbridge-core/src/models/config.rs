//! Configuration structures for extraction and analysis.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkillbridgeError};

/// Main configuration for the skillbridge pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillbridgeConfig {
    /// Text extraction configuration.
    pub extraction: ExtractionConfig,

    /// Analysis configuration.
    pub analysis: AnalysisConfig,
}

/// Text extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Vertical distance between consecutive PDF fragments that starts a new line.
    pub line_break_threshold: f64,

    /// Minimum stripped DOCX text length before the strategy accepts it.
    pub docx_min_text_length: usize,

    /// Maximum PDF pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Retry with whole-document extraction when the positioned walk finds no text.
    pub pdf_text_fallback: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            line_break_threshold: 5.0,
            docx_min_text_length: 100,
            max_pages: 0,
            pdf_text_fallback: true,
        }
    }
}

/// Analysis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Role used when the caller does not pick one.
    pub default_role: String,

    /// Extra role profiles merged over the built-in corpus.
    pub extra_roles: Vec<RoleProfileConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_role: "Software Engineer".to_string(),
            extra_roles: Vec::new(),
        }
    }
}

/// A role profile as written in a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleProfileConfig {
    pub name: String,
    pub skills: Vec<String>,
    pub keywords: Vec<String>,
}

impl SkillbridgeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| SkillbridgeError::Config(format!("{}: {e}", path.display())))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| SkillbridgeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

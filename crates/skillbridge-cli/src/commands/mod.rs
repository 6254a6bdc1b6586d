//! Subcommands and the helpers they share.

pub mod analyze;
pub mod batch;
pub mod config;
pub mod extract;
pub mod roles;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use skillbridge_core::models::document::MediaKind;
use skillbridge_core::SkillbridgeConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skillbridge")
        .join("config.json")
}

/// Configuration file in effect: the `--config` path, else the default location.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration. An explicit path must exist; the default location is optional.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SkillbridgeConfig> {
    if let Some(path) = config_path {
        return Ok(SkillbridgeConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config at {}", default_path.display());
        Ok(SkillbridgeConfig::from_file(&default_path)?)
    } else {
        Ok(SkillbridgeConfig::default())
    }
}

/// A resume read from disk, with the media type a browser would declare.
pub struct InputFile {
    pub data: Vec<u8>,
    pub media_type: &'static str,
    pub file_name: String,
}

impl InputFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Input file not found: {}", path.display());
        }

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        Ok(Self {
            data: fs::read(path)?,
            media_type: MediaKind::media_type_for_extension(extension),
            file_name,
        })
    }

    pub fn document(&self) -> skillbridge_core::Document<'_> {
        skillbridge_core::Document::new(&self.data, self.media_type, &self.file_name)
    }
}

/// Whether a path has an extension the extractor handles.
pub fn is_supported(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "docx")
}

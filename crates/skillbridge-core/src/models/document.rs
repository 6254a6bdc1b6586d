//! Input document and request shapes supplied by the UI collaborator.

use serde::{Deserialize, Serialize};

/// Media type of a DOCX document.
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// A caller-owned document. Extraction only borrows it.
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    /// Raw payload.
    pub data: &'a [u8],
    /// Declared media type (may be empty).
    pub media_type: &'a str,
    /// Original file name, used for extension sniffing.
    pub file_name: &'a str,
}

/// Format family resolved from the declared media type and file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// `text/plain` or `.txt`.
    PlainText,
    /// `application/pdf` or `.pdf`.
    Pdf,
    /// Word-processor XML container.
    Docx,
    /// Anything else.
    Unknown,
}

impl<'a> Document<'a> {
    pub fn new(data: &'a [u8], media_type: &'a str, file_name: &'a str) -> Self {
        Self {
            data,
            media_type,
            file_name,
        }
    }

    /// Resolve the format family. Plain text wins over PDF, PDF over DOCX.
    pub fn kind(&self) -> MediaKind {
        let name = self.file_name.to_ascii_lowercase();
        let media_type = self.media_type.trim().to_ascii_lowercase();

        if media_type == "text/plain" || name.ends_with(".txt") {
            MediaKind::PlainText
        } else if media_type == "application/pdf" || name.ends_with(".pdf") {
            MediaKind::Pdf
        } else if media_type == DOCX_MEDIA_TYPE || name.ends_with(".docx") {
            MediaKind::Docx
        } else {
            MediaKind::Unknown
        }
    }
}

impl MediaKind {
    /// Media type to declare for a file extension, as a browser would.
    pub fn media_type_for_extension(extension: &str) -> &'static str {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => "application/pdf",
            "txt" => "text/plain",
            "docx" => DOCX_MEDIA_TYPE,
            _ => "application/octet-stream",
        }
    }
}

/// Analysis request from the UI collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Target role, normally one of [`crate::analysis::ROLE_MENU`].
    pub role: String,

    /// Academic year. Accepted but not used by scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub academic_year: Option<String>,

    /// Branch of study. Accepted but not used by scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl AnalysisRequest {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            ..Default::default()
        }
    }

    pub fn with_academic_year(mut self, year: impl Into<String>) -> Self {
        self.academic_year = Some(year.into());
        self
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }
}

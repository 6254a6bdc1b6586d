//! Document text extraction.
//!
//! [`DocumentTextExtractor`] picks a strategy from the document's declared
//! media type and file name. Strategy errors are logged and degrade to a
//! fallback strategy or an empty string; they never reach the caller.

pub mod docx;
pub mod layout;
pub mod pdf;

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, info, warn};

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::document::{Document, MediaKind};
use crate::timing::Stopwatch;

pub use layout::{PageSource, TextFragment};
pub use pdf::PdfExtractor;

/// Result type for extraction strategies.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Extracted text shorter than this is treated as low-information.
pub const LOW_TEXT_THRESHOLD: usize = 50;

/// Converts a document into best-effort plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract text. Never fails; an unreadable document yields an empty string.
    fn extract(&self, document: &Document<'_>) -> String;
}

/// Strategy chain over plain text, PDF and DOCX.
#[derive(Debug, Clone, Default)]
pub struct DocumentTextExtractor {
    config: ExtractionConfig,
}

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom extraction configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn run_chain(&self, document: &Document<'_>) -> String {
        match document.kind() {
            MediaKind::PlainText => decode_text(document.data),
            MediaKind::Pdf => self.extract_pdf(document.data).unwrap_or_else(|e| {
                warn!("Error extracting PDF text: {}", e);
                String::new()
            }),
            MediaKind::Docx => {
                match docx::extract_docx_text(document.data, self.config.docx_min_text_length) {
                    Ok(text) => text,
                    Err(e) => {
                        debug!("DOCX strategy fell through: {}", e);
                        decode_text(document.data)
                    }
                }
            }
            MediaKind::Unknown => decode_text(document.data),
        }
    }

    /// Layout-aware extraction over the content streams, with a whole-document
    /// pass when the streams decode to unreadable text.
    fn extract_pdf(&self, data: &[u8]) -> Result<String> {
        let mut extractor = PdfExtractor::new();
        extractor.load(data)?;
        info!("PDF loaded, number of pages: {}", extractor.page_count());

        let laid_out = layout::layout_pages(
            &extractor,
            self.config.line_break_threshold,
            self.config.max_pages,
        );
        let text = layout::normalize_whitespace(&laid_out);

        if self.config.pdf_text_fallback && !pdf::is_readable(&text) {
            match extractor.extract_plain_text() {
                Ok(fallback) => {
                    let fallback = layout::normalize_whitespace(&fallback);
                    if pdf::is_readable(&fallback) {
                        debug!("Using pdf-extract text ({} chars)", fallback.len());
                        return Ok(fallback);
                    }
                }
                Err(e) => debug!("pdf-extract fallback failed: {}", e),
            }
        }

        Ok(text)
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, document: &Document<'_>) -> String {
        let stopwatch = Stopwatch::start();
        debug!(
            "Processing file: {} (type: {:?}, {} bytes)",
            document.file_name,
            document.media_type,
            document.data.len()
        );

        let text = match panic::catch_unwind(AssertUnwindSafe(|| self.run_chain(document))) {
            Ok(text) => text,
            Err(_) => {
                warn!("Text extraction panicked for {}", document.file_name);
                String::new()
            }
        };

        let length = text.chars().count();
        if length < LOW_TEXT_THRESHOLD {
            warn!("Very little text extracted ({} chars)", length);
        }
        debug!(
            "Extracted text length: {} in {}ms",
            length,
            stopwatch.elapsed_ms()
        );
        text
    }
}

/// Lossy UTF-8 decode with any byte-order mark removed.
pub fn decode_text(data: &[u8]) -> String {
    let data = data.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(data);
    String::from_utf8_lossy(data).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DOCX_MEDIA_TYPE;
    use pretty_assertions::assert_eq;

    fn extract(data: &[u8], media_type: &str, file_name: &str) -> String {
        DocumentTextExtractor::new().extract(&Document::new(data, media_type, file_name))
    }

    #[test]
    fn test_plain_text_by_media_type() {
        assert_eq!(extract(b"Skills: Rust", "text/plain", "resume"), "Skills: Rust");
    }

    #[test]
    fn test_plain_text_by_extension_strips_bom() {
        assert_eq!(extract(b"\xEF\xBB\xBFHello", "", "CV.TXT"), "Hello");
    }

    #[test]
    fn test_pdf_two_lines() {
        let mut ops = pdf::tests::text_at(72, 700, "Education");
        ops.extend(pdf::tests::text_at(72, 690, "B.Tech Computer Science"));
        ops.extend(pdf::tests::text_at(300, 688, "2021"));
        let data = pdf::tests::build_pdf(vec![ops]);

        assert_eq!(
            extract(&data, "application/pdf", "cv.pdf"),
            "Education\nB.Tech Computer Science 2021"
        );
    }

    #[test]
    fn test_pdf_pages_separated_by_blank_line() {
        let data = pdf::tests::build_pdf(vec![
            pdf::tests::text_at(72, 700, "Page one"),
            pdf::tests::text_at(72, 700, "Page two"),
        ]);
        assert_eq!(extract(&data, "", "cv.pdf"), "Page one\n\nPage two");
    }

    #[test]
    fn test_broken_pdf_yields_empty_text() {
        assert_eq!(extract(b"%PDF-1.7 truncated", "application/pdf", "cv.pdf"), "");
    }

    #[test]
    fn test_docx_container() {
        let body = "Experience Software engineer building payment APIs in Rust, Go and PostgreSQL for four years.";
        let data = docx::tests::build_docx(body);
        assert_eq!(extract(&data, DOCX_MEDIA_TYPE, "cv.docx"), body);
    }

    #[test]
    fn test_short_docx_falls_through_to_raw_decode() {
        let raw = b"<w:t>short</w:t>";
        assert_eq!(extract(raw, "", "cv.docx"), "<w:t>short</w:t>");
    }

    #[test]
    fn test_unknown_type_decodes_raw() {
        assert_eq!(extract(b"caf\xC3\xA9 \xFF", "application/octet-stream", "cv.bin"), "caf\u{e9} \u{fffd}");
    }
}

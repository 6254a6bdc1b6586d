//! DOCX text recovery.
//!
//! With the `native` feature the `word/document.xml` part is read from the zip
//! container. Otherwise, or when the container cannot be opened, the raw bytes
//! are decoded lossily and scanned for markup.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::Result;
use crate::error::ExtractionError;

lazy_static! {
    static ref LINE_BREAK: Regex = Regex::new(r"</w:p>|<w:p/>|<w:(?:br|cr)\b[^>]*>").unwrap();
    static ref TAB: Regex = Regex::new(r"<w:tab\b[^>]*>").unwrap();
    static ref TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[^\S\n]+").unwrap();
    static ref NEWLINES: Regex = Regex::new(r"\s*\n\s*").unwrap();
}

const DOCUMENT_PART: &str = "word/document.xml";

/// Recover body text from a DOCX payload.
///
/// Fails when the recovered text is not longer than `min_length` characters.
pub fn extract_docx_text(data: &[u8], min_length: usize) -> Result<String> {
    let xml = match read_document_part(data) {
        Ok(xml) => xml,
        Err(e) => {
            debug!("Falling back to raw DOCX scan: {}", e);
            String::from_utf8_lossy(data).into_owned()
        }
    };

    let text = strip_markup(&xml);
    let length = text.chars().count();
    if length > min_length {
        Ok(text)
    } else {
        Err(ExtractionError::Rejected(format!(
            "DOCX text too short ({length} characters)"
        )))
    }
}

#[cfg(feature = "native")]
fn read_document_part(data: &[u8]) -> Result<String> {
    use std::io::{Cursor, Read};

    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    let mut bytes = Vec::new();
    part.read_to_end(&mut bytes)
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(not(feature = "native"))]
fn read_document_part(_data: &[u8]) -> Result<String> {
    Err(ExtractionError::Docx(format!(
        "zip support disabled, cannot read {DOCUMENT_PART}"
    )))
}

/// Strip markup to text, one line per paragraph.
///
/// Tags are removed without inserting whitespace, so a word split across runs
/// stays whole. Only paragraph ends, breaks and tabs separate text.
pub fn strip_markup(xml: &str) -> String {
    let with_breaks = LINE_BREAK.replace_all(xml, "\n");
    let with_tabs = TAB.replace_all(&with_breaks, " ");
    let without_tags = TAG.replace_all(&with_tabs, "");
    let decoded = without_tags
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&");
    let collapsed = HORIZONTAL_WS.replace_all(&decoded, " ");
    NEWLINES.replace_all(&collapsed, "\n").trim().to_string()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn build_docx(body: &str) -> Vec<u8> {
        build_docx_xml(&format!("<w:p><w:r><w:t>{body}</w:t></w:r></w:p>"))
    }

    fn build_docx_xml(paragraphs: &str) -> Vec<u8> {
        use std::io::{Cursor, Write};
        use zip::write::SimpleFileOptions;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer
            .start_file(DOCUMENT_PART, SimpleFileOptions::default())
            .unwrap();
        let xml = format!(
            "<?xml version=\"1.0\"?><w:document><w:body>{paragraphs}</w:body></w:document>"
        );
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_strip_markup() {
        let xml = "<w:p><w:t>Skills</w:t></w:p>\n<w:p><w:t>C++ &amp; Rust</w:t></w:p>";
        assert_eq!(strip_markup(xml), "Skills\nC++ & Rust");
    }

    #[test]
    fn test_breaks_and_tabs_separate_text() {
        let xml = "<w:p><w:r><w:t>Go</w:t><w:tab/><w:t>Rust</w:t><w:br/><w:t>SQL</w:t></w:r></w:p>";
        assert_eq!(strip_markup(xml), "Go Rust\nSQL");
    }

    #[test]
    fn test_split_runs_rejoin_words() {
        let paragraphs = concat!(
            "<w:p><w:r><w:t>Skills: Pyth</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>on</w:t></w:r>",
            "<w:r><w:t xml:space=\"preserve\">, Dock</w:t></w:r><w:r><w:t>er</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>Experience: built data pipelines and internal tools for a logistics startup.</w:t></w:r></w:p>",
        );
        let data = build_docx_xml(paragraphs);
        let text = extract_docx_text(&data, 50).unwrap();
        assert_eq!(
            text,
            "Skills: Python, Docker\nExperience: built data pipelines and internal tools for a logistics startup."
        );
    }

    #[test]
    fn test_reads_document_part() {
        let body = "Experience Built distributed systems in Rust and Go for five years at a payments company.";
        let data = build_docx(body);
        let text = extract_docx_text(&data, 50).unwrap();
        assert_eq!(text, body);
    }

    #[test]
    fn test_short_text_rejected() {
        let data = build_docx("Too short");
        assert!(matches!(
            extract_docx_text(&data, 100),
            Err(ExtractionError::Rejected(_))
        ));
    }

    #[test]
    fn test_non_zip_payload_scanned_raw() {
        let raw = format!("<w:t>{}</w:t>", "resume text ".repeat(20));
        let text = extract_docx_text(raw.as_bytes(), 100).unwrap();
        assert!(text.starts_with("resume text resume text"));
    }
}

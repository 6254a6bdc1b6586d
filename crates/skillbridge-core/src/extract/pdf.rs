//! PDF text extraction using lopdf content streams, with pdf-extract as a fallback.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object};
use tracing::{debug, trace, warn};

use super::layout::{PageSource, TextFragment};
use super::Result;
use crate::error::ExtractionError;

/// TJ displacement (thousandths of text space) treated as a word gap.
const WORD_GAP: f64 = -250.0;

/// PDF loader that yields positioned text fragments page by page.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load a PDF from bytes.
    pub fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc =
            Document::load_mem(data).map_err(|e| ExtractionError::PdfParse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(ExtractionError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| ExtractionError::PdfParse(format!("failed to save decrypted PDF: {e}")))?;
            self.raw_data = decrypted;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(ExtractionError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    /// Whole-document text from pdf-extract, for PDFs whose content streams
    /// do not decode to readable fragments.
    pub fn extract_plain_text(&self) -> Result<String> {
        let data = self.raw_data.as_slice();
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::PdfParse(e.to_string())),
            Err(_) => Err(ExtractionError::PdfParse("pdf-extract panicked".to_string())),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| ExtractionError::PdfParse("no document loaded".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for PdfExtractor {
    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>> {
        let doc = self.document()?;
        let pages = doc.get_pages();
        let page_id = *pages.get(&page).ok_or(ExtractionError::InvalidPage(page))?;

        let raw = doc
            .get_page_content(page_id)
            .map_err(|e| ExtractionError::PageContent {
                page,
                reason: e.to_string(),
            })?;
        let content = Content::decode(&raw).map_err(|e| ExtractionError::PageContent {
            page,
            reason: e.to_string(),
        })?;

        let mut walker = TextWalker::default();
        for operation in &content.operations {
            walker.apply(operation);
        }

        trace!("Page {} yielded {} fragments", page, walker.fragments.len());
        Ok(walker.fragments)
    }
}

/// Row-vector affine matrix `[a b c d e f]` as used by PDF.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f64, ty: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`
    fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() < 6 {
            return None;
        }
        let mut m = [0.0; 6];
        for (slot, operand) in m.iter_mut().zip(operands) {
            *slot = number(operand)?;
        }
        Some(Matrix(m))
    }
}

/// Tracks the graphics and text state needed to place text-showing operators.
struct TextWalker {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f64,
    fragments: Vec<TextFragment>,
}

impl Default for TextWalker {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            ctm_stack: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            fragments: Vec::new(),
        }
    }
}

impl TextWalker {
    fn apply(&mut self, op: &Operation) {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => self.ctm_stack.push(self.ctm),
            "Q" => {
                if let Some(ctm) = self.ctm_stack.pop() {
                    self.ctm = ctm;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.ctm = m.then(&self.ctm);
                }
            }
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "Tm" => {
                if let Some(m) = Matrix::from_operands(operands) {
                    self.text_matrix = m;
                    self.line_matrix = m;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (operand(operands, 0), operand(operands, 1)) {
                    self.next_line(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (operand(operands, 0), operand(operands, 1)) {
                    self.leading = -ty;
                    self.next_line(tx, ty);
                }
            }
            "TL" => {
                if let Some(leading) = operand(operands, 0) {
                    self.leading = leading;
                }
            }
            "T*" => self.next_line(0.0, -self.leading),
            "Tj" => {
                if let Some(text) = operands.first().and_then(string_operand) {
                    self.show(text);
                }
            }
            "'" => {
                self.next_line(0.0, -self.leading);
                if let Some(text) = operands.first().and_then(string_operand) {
                    self.show(text);
                }
            }
            "\"" => {
                self.next_line(0.0, -self.leading);
                if let Some(text) = operands.get(2).and_then(string_operand) {
                    self.show(text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let text = array_text(items);
                    self.show(text);
                }
            }
            _ => {}
        }
    }

    fn next_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn show(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        let y = self.text_matrix.then(&self.ctm).0[5];
        self.fragments.push(TextFragment::new(text, Some(y)));
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

fn operand(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(number)
}

fn string_operand(object: &Object) -> Option<String> {
    match object {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

fn array_text(items: &[Object]) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
            other => {
                if let Some(offset) = number(other) {
                    if offset < WORD_GAP && !text.ends_with(' ') {
                        text.push(' ');
                    }
                }
            }
        }
    }
    text
}

/// Decode a PDF string: UTF-16BE with BOM, otherwise one byte per character.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        return char::decode_utf16(units)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
    }
    bytes.iter().map(|&b| b as char).collect()
}

/// Whether fragment text looks like readable text rather than raw glyph ids.
pub fn is_readable(text: &str) -> bool {
    let mut visible = 0usize;
    let mut garbage = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        visible += 1;
        if c.is_control() || c == char::REPLACEMENT_CHARACTER {
            garbage += 1;
        }
    }
    if visible == 0 {
        return false;
    }
    let readable = garbage * 10 <= visible * 3;
    if !readable {
        warn!("PDF text looks garbled: {}/{} unreadable characters", garbage, visible);
    }
    readable
}

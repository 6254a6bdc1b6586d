//! Layout reconstruction from positioned text fragments.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use super::Result;

lazy_static! {
    static ref HORIZONTAL_WS: Regex = Regex::new(r"[^\S\n]+").unwrap();
    static ref LEADING_SPACE: Regex = Regex::new(r"(?m)^ +").unwrap();
    static ref TRAILING_SPACE: Regex = Regex::new(r"(?m) +$").unwrap();
    static ref EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// A run of text positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    /// Fragment text as decoded from the content stream.
    pub text: String,
    /// Vertical coordinate in page space, if known.
    pub y: Option<f64>,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, y: Option<f64>) -> Self {
        Self {
            text: text.into(),
            y,
        }
    }
}

/// A paged document whose pages yield positioned fragments.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Fragments of a page (1-indexed), in content-stream order.
    fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>>;
}

/// Join one page's fragments into lines.
///
/// A fragment whose vertical coordinate differs from the previous fragment's by
/// more than `threshold` starts a new line; otherwise fragments are joined by a
/// single space.
pub fn layout_page(fragments: &[TextFragment], threshold: f64) -> String {
    let mut text = String::new();
    let mut last_y: Option<f64> = None;

    for fragment in fragments {
        let piece = fragment.text.replace('\u{00a0}', " ");
        if piece.trim().is_empty() {
            continue;
        }

        match (last_y, fragment.y) {
            (Some(prev), Some(current)) if (current - prev).abs() > threshold => {
                text.push('\n');
            }
            _ => {
                if !text.is_empty() && !text.ends_with(' ') && !text.ends_with('\n') {
                    text.push(' ');
                }
            }
        }

        text.push_str(&piece);
        last_y = fragment.y;
    }

    text
}

/// Lay out every page in ascending order, separating pages by a blank line.
///
/// Pages that fail to yield fragments are skipped. `max_pages == 0` reads all pages.
pub fn layout_pages<S: PageSource + ?Sized>(source: &S, threshold: f64, max_pages: usize) -> String {
    let page_count = source.page_count();
    let last_page = if max_pages == 0 {
        page_count
    } else {
        page_count.min(max_pages as u32)
    };

    let mut full_text = String::new();
    for page in 1..=last_page {
        match source.page_fragments(page) {
            Ok(fragments) => {
                debug!("Page {}: {} fragments", page, fragments.len());
                full_text.push_str(layout_page(&fragments, threshold).trim());
                full_text.push_str("\n\n");
            }
            Err(e) => {
                warn!("Could not extract text from page {}: {}", page, e);
            }
        }
    }

    full_text
}

/// Normalize whitespace while keeping line structure.
pub fn normalize_whitespace(text: &str) -> String {
    let text = HORIZONTAL_WS.replace_all(text, " ");
    let text = LEADING_SPACE.replace_all(&text, "");
    let text = TRAILING_SPACE.replace_all(&text, "");
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use pretty_assertions::assert_eq;

    struct MemoryPages(Vec<Option<Vec<TextFragment>>>);

    impl PageSource for MemoryPages {
        fn page_count(&self) -> u32 {
            self.0.len() as u32
        }

        fn page_fragments(&self, page: u32) -> Result<Vec<TextFragment>> {
            self.0[(page - 1) as usize]
                .clone()
                .ok_or(ExtractionError::InvalidPage(page))
        }
    }

    #[test]
    fn test_vertical_jump_breaks_line() {
        let fragments = vec![
            TextFragment::new("Education", Some(700.0)),
            TextFragment::new("B.Tech, IIT", Some(688.0)),
        ];
        assert_eq!(layout_page(&fragments, 5.0), "Education\nB.Tech, IIT");
    }

    #[test]
    fn test_small_vertical_delta_joins_with_space() {
        let fragments = vec![
            TextFragment::new("Python", Some(700.0)),
            TextFragment::new("Rust", Some(695.0)),
        ];
        assert_eq!(layout_page(&fragments, 5.0), "Python Rust");
    }

    #[test]
    fn test_no_double_space_after_trailing_space() {
        let fragments = vec![
            TextFragment::new("Skills: ", Some(500.0)),
            TextFragment::new("SQL", Some(500.0)),
        ];
        assert_eq!(layout_page(&fragments, 5.0), "Skills: SQL");
    }

    #[test]
    fn test_blank_fragments_do_not_move_tracker() {
        let fragments = vec![
            TextFragment::new("Header", Some(700.0)),
            TextFragment::new("   ", Some(600.0)),
            TextFragment::new("Same line", Some(698.0)),
        ];
        assert_eq!(layout_page(&fragments, 5.0), "Header Same line");
    }

    #[test]
    fn test_nbsp_becomes_space() {
        let fragments = vec![TextFragment::new("Node\u{00a0}js", Some(1.0))];
        assert_eq!(layout_page(&fragments, 5.0), "Node js");
    }

    #[test]
    fn test_unpositioned_fragments_join() {
        let fragments = vec![
            TextFragment::new("a", None),
            TextFragment::new("b", Some(100.0)),
            TextFragment::new("c", None),
        ];
        assert_eq!(layout_page(&fragments, 5.0), "a b c");
    }

    #[test]
    fn test_pages_in_order_and_failed_pages_skipped() {
        let pages = MemoryPages(vec![
            Some(vec![TextFragment::new("first", Some(10.0))]),
            None,
            Some(vec![TextFragment::new("third", Some(10.0))]),
        ]);
        assert_eq!(layout_pages(&pages, 5.0, 0), "first\n\nthird\n\n");
        assert_eq!(layout_pages(&pages, 5.0, 1), "first\n\n");
    }

    #[test]
    fn test_normalize_whitespace_keeps_lines() {
        let raw = "  Name   Here \n\n\n\n   Skills:\t Rust  \n\n";
        assert_eq!(normalize_whitespace(raw), "Name Here\n\nSkills: Rust");
    }

    #[test]
    fn test_normalize_whitespace_strips_line_ends() {
        assert_eq!(normalize_whitespace("Skills \r\nRust\t\r\nGo"), "Skills\nRust\nGo");
    }
}

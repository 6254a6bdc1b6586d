//! Regex patterns and whole-word term matchers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Any digit.
    pub static ref DIGIT: Regex = Regex::new(r"\d").unwrap();

    /// "proficient in X", "experienced with X", "knowledge of X", ...
    pub static ref PROFICIENCY_MENTION: Regex = Regex::new(
        r"(?:proficient|experienced|skilled|expertise|knowledge)\s+(?:in|with|of)\s+(\w+(?:\.\w+)?)"
    ).unwrap();

    /// "worked with X", "working on X", ...
    pub static ref WORK_MENTION: Regex = Regex::new(
        r"(?:worked|work|working)\s+(?:with|on)\s+(\w+(?:\.\w+)?)"
    ).unwrap();
}

/// Free-text skill mention patterns, applied to lowercased text.
pub fn mention_patterns() -> [&'static Regex; 2] {
    [&PROFICIENCY_MENTION, &WORK_MENTION]
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Case-insensitive whole-word matcher for one corpus term.
///
/// A word boundary is only required on an edge whose character is itself a
/// word character, so terms such as `C++` or `C#` match where written.
#[derive(Debug, Clone)]
pub struct WordMatcher {
    term: String,
    regex: Regex,
}

impl WordMatcher {
    pub fn new(term: &str) -> Result<Self, regex::Error> {
        let leading = if term.chars().next().is_some_and(is_word_char) {
            r"\b"
        } else {
            ""
        };
        let trailing = if term.chars().next_back().is_some_and(is_word_char) {
            r"\b"
        } else {
            ""
        };
        let regex = Regex::new(&format!("(?i){leading}{}{trailing}", regex::escape(term)))?;

        Ok(Self {
            term: term.to_string(),
            regex,
        })
    }

    /// The term as written in the corpus.
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Number of non-overlapping occurrences in `text`.
    pub fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_word_only() {
        let m = WordMatcher::new("Java").unwrap();
        assert!(m.is_match("Java and Go"));
        assert!(m.is_match("wrote JAVA daily"));
        assert!(!m.is_match("JavaScript"));
    }

    #[test]
    fn test_symbol_terms() {
        assert!(WordMatcher::new("C++").unwrap().is_match("Languages: C++, Rust"));
        assert!(WordMatcher::new("C#").unwrap().is_match("c# and .net"));
        assert!(WordMatcher::new("CI/CD").unwrap().is_match("ci/cd pipelines"));
        assert!(!WordMatcher::new("C++").unwrap().is_match("C"));
    }

    #[test]
    fn test_metacharacters_escaped() {
        let m = WordMatcher::new("Node.js").unwrap();
        assert!(m.is_match("node.js backend"));
        assert!(!m.is_match("nodexjs"));
    }

    #[test]
    fn test_count() {
        let m = WordMatcher::new("api").unwrap();
        assert_eq!(m.count("API design, REST api, rapid"), 2);
    }

    #[test]
    fn test_mention_patterns() {
        let caps = PROFICIENCY_MENTION
            .captures("proficient in django and more")
            .unwrap();
        assert_eq!(&caps[1], "django");
        let caps = WORK_MENTION.captures("worked with node.js services").unwrap();
        assert_eq!(&caps[1], "node.js");
    }
}

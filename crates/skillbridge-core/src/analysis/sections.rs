//! Resume section segmentation by header keywords.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Longest span kept for one section, in characters.
pub const MAX_SECTION_CHARS: usize = 1000;

/// Bytes skipped past a header before looking for the next one.
const HEADER_LOOKAHEAD: usize = 10;

/// The five fixed resume sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionName {
    Education,
    Experience,
    Skills,
    Projects,
    Certifications,
}

impl SectionName {
    pub const ALL: [SectionName; 5] = [
        SectionName::Education,
        SectionName::Experience,
        SectionName::Skills,
        SectionName::Projects,
        SectionName::Certifications,
    ];

    /// Header aliases in priority order.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            SectionName::Education => &[
                "education",
                "academic",
                "qualification",
                "degree",
                "university",
                "college",
            ],
            SectionName::Experience => &[
                "experience",
                "work history",
                "employment",
                "professional",
                "work experience",
                "internship",
            ],
            SectionName::Skills => &[
                "skills",
                "technical skills",
                "competencies",
                "expertise",
                "technologies",
                "tools",
            ],
            SectionName::Projects => &[
                "projects",
                "portfolio",
                "achievements",
                "accomplishments",
                "work samples",
            ],
            SectionName::Certifications => &[
                "certifications",
                "certificates",
                "credentials",
                "awards",
                "honors",
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SectionName::Education => "education",
            SectionName::Experience => "experience",
            SectionName::Skills => "skills",
            SectionName::Projects => "projects",
            SectionName::Certifications => "certifications",
        }
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sections found in a resume text. Absent sections have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap {
    sections: BTreeMap<SectionName, String>,
}

impl SectionMap {
    /// Split `text` into sections.
    ///
    /// Each section starts at the first of its aliases (in priority order) found
    /// anywhere in the text and ends at the nearest later alias of a different
    /// section, the end of the text, or after [`MAX_SECTION_CHARS`] characters.
    pub fn segment(text: &str) -> Self {
        let lower = text.to_ascii_lowercase();
        let mut sections = BTreeMap::new();

        for name in SectionName::ALL {
            let Some((start, alias)) = name
                .aliases()
                .iter()
                .find_map(|alias| lower.find(alias).map(|pos| (pos, *alias)))
            else {
                continue;
            };

            let end = next_header(&lower, name, start + alias.len() + HEADER_LOOKAHEAD)
                .unwrap_or(text.len());
            let span: String = text[start..end].chars().take(MAX_SECTION_CHARS).collect();

            trace!(
                "Section {} at {} via {:?} ({} chars)",
                name,
                start,
                alias,
                span.chars().count()
            );
            sections.insert(name, span);
        }

        Self { sections }
    }

    pub fn get(&self, name: SectionName) -> Option<&str> {
        self.sections.get(&name).map(String::as_str)
    }

    /// Length of a section in characters, 0 when absent.
    pub fn char_len(&self, name: SectionName) -> usize {
        self.get(name).map_or(0, |s| s.chars().count())
    }

    pub fn contains(&self, name: SectionName) -> bool {
        self.sections.contains_key(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionName, &str)> {
        self.sections.iter().map(|(name, text)| (*name, text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Position of the nearest alias of any section other than `current`, at or after `from`.
fn next_header(lower: &str, current: SectionName, from: usize) -> Option<usize> {
    let mut from = from;
    while from < lower.len() && !lower.is_char_boundary(from) {
        from += 1;
    }
    let haystack = lower.get(from..)?;

    SectionName::ALL
        .iter()
        .filter(|other| **other != current)
        .flat_map(|other| other.aliases())
        .filter_map(|alias| haystack.find(alias))
        .min()
        .map(|pos| from + pos)
}

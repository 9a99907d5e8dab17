//! Passage references and their human-readable citation form.

use crate::book::BookName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How much of the text a citation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// A whole chapter (`Genesis 1`), or a chapter span with no verses.
    Chapter,
    /// A single verse (`John 3:16`).
    Verse,
    /// A verse range, within a chapter or across chapters.
    Range,
}

impl Granularity {
    /// Classify a citation from its bounds.
    ///
    /// Evaluated in order: no verse on either side is `Chapter`; a chapter
    /// change or two differing verse bounds is `Range`; anything else is
    /// `Verse`.
    #[must_use]
    pub fn classify(
        start_chapter: u16,
        start_verse: Option<u16>,
        end_chapter: u16,
        end_verse: Option<u16>,
    ) -> Self {
        match (start_verse, end_verse) {
            (None, None) => Self::Chapter,
            _ if end_chapter != start_chapter => Self::Range,
            (Some(a), Some(b)) if a != b => Self::Range,
            _ => Self::Verse,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Verse => "verse",
            Self::Range => "range",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scriptural citation found in free-form text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageReference {
    pub book: BookName,
    pub start_chapter: u16,
    pub start_verse: Option<u16>,
    pub end_chapter: u16,
    pub end_verse: Option<u16>,
    pub granularity: Granularity,
    /// The exact substring the citation was parsed from.
    pub citation_text: String,
}

impl PassageReference {
    /// Borrow the bounds of this reference for display.
    #[must_use]
    pub fn span(&self) -> PassageSpan<'_> {
        PassageSpan {
            book: self.book.as_str(),
            start_chapter: self.start_chapter,
            start_verse: self.start_verse,
            end_chapter: Some(self.end_chapter),
            end_verse: self.end_verse,
            granularity: Some(self.granularity),
        }
    }
}

impl fmt::Display for PassageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.span(), f)
    }
}

/// Borrowed passage bounds, formatted as a conventional citation.
///
/// | bounds                        | output            |
/// |-------------------------------|-------------------|
/// | chapter only                  | `Luke 2`          |
/// | chapter span, no verses       | `Genesis 1–3`     |
/// | single verse                  | `Luke 2:14`       |
/// | same-chapter range            | `Luke 2:1–20`     |
/// | cross-chapter range           | `Luke 2:41–3:6`   |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassageSpan<'a> {
    pub book: &'a str,
    pub start_chapter: u16,
    pub start_verse: Option<u16>,
    pub end_chapter: Option<u16>,
    pub end_verse: Option<u16>,
    pub granularity: Option<Granularity>,
}

const EN_DASH: char = '–';

impl fmt::Display for PassageSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = self.book;
        let sc = self.start_chapter;
        let ec = self.end_chapter.unwrap_or(sc);

        if (self.start_verse.is_none() && self.end_verse.is_none())
            || self.granularity == Some(Granularity::Chapter)
        {
            return if ec == sc {
                write!(f, "{book} {sc}")
            } else {
                write!(f, "{book} {sc}{EN_DASH}{ec}")
            };
        }

        if ec != sc {
            write!(f, "{book} {sc}:{}{EN_DASH}{ec}", self.start_verse.unwrap_or(1))?;
            if let Some(ev) = self.end_verse {
                write!(f, ":{ev}")?;
            }
            return Ok(());
        }

        match (self.start_verse, self.end_verse) {
            (Some(sv), Some(ev)) if ev != sv => write!(f, "{book} {sc}:{sv}{EN_DASH}{ev}"),
            (Some(v), _) | (None, Some(v)) => write!(f, "{book} {sc}:{v}"),
            (None, None) => write!(f, "{book} {sc}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::CanonicalBook;

    fn span(
        sc: u16,
        sv: Option<u16>,
        ec: Option<u16>,
        ev: Option<u16>,
    ) -> PassageSpan<'static> {
        PassageSpan {
            book: "Luke",
            start_chapter: sc,
            start_verse: sv,
            end_chapter: ec,
            end_verse: ev,
            granularity: None,
        }
    }

    #[test]
    fn classify_follows_tie_break_order() {
        assert_eq!(Granularity::classify(1, None, 1, None), Granularity::Chapter);
        // A hyphenated end chapter without verses is still a chapter citation.
        assert_eq!(Granularity::classify(1, None, 3, None), Granularity::Chapter);
        assert_eq!(
            Granularity::classify(3, Some(16), 3, Some(16)),
            Granularity::Verse
        );
        assert_eq!(
            Granularity::classify(3, Some(1), 3, Some(5)),
            Granularity::Range
        );
        assert_eq!(
            Granularity::classify(3, Some(16), 4, Some(2)),
            Granularity::Range
        );
        assert_eq!(Granularity::classify(3, Some(16), 3, None), Granularity::Verse);
    }

    #[test]
    fn formats_each_shape() {
        assert_eq!(span(2, None, None, None).to_string(), "Luke 2");
        assert_eq!(span(2, None, Some(4), None).to_string(), "Luke 2–4");
        assert_eq!(span(2, Some(14), Some(2), Some(14)).to_string(), "Luke 2:14");
        assert_eq!(span(2, Some(14), None, None).to_string(), "Luke 2:14");
        assert_eq!(span(2, Some(1), Some(2), Some(20)).to_string(), "Luke 2:1–20");
        assert_eq!(span(2, Some(41), Some(3), Some(6)).to_string(), "Luke 2:41–3:6");
        assert_eq!(span(2, None, Some(3), Some(6)).to_string(), "Luke 2:1–3:6");
        assert_eq!(span(2, Some(41), Some(3), None).to_string(), "Luke 2:41–3");
    }

    #[test]
    fn reference_displays_through_span() {
        let reference = PassageReference {
            book: BookName::Canonical(CanonicalBook::John),
            start_chapter: 3,
            start_verse: Some(16),
            end_chapter: 3,
            end_verse: Some(16),
            granularity: Granularity::Verse,
            citation_text: "Jn 3:16".to_string(),
        };
        assert_eq!(reference.to_string(), "John 3:16");
    }

    #[test]
    fn granularity_serializes_lowercase() {
        let json = serde_json::to_string(&Granularity::Range).expect("serialize");
        assert_eq!(json, "\"range\"");
    }
}

//! Mention rows handed to the ingestion collaborator.
//!
//! Each citation extracted from an explanation body becomes one
//! [`PassageMention`] tied to the explanation's identifier. Storing the rows is
//! the collaborator's job; nothing here is retained.

use crate::book::BookName;
use crate::passage::{Granularity, PassageReference, PassageSpan};
use crate::reference;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One passage mention, shaped like the `passage_mention` row it becomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageMention {
    pub explanation_id: String,
    pub book: BookName,
    pub start_chapter: u16,
    pub start_verse: Option<u16>,
    pub end_chapter: u16,
    pub end_verse: Option<u16>,
    pub ref_citation: String,
    pub granularity: Granularity,
}

impl PassageMention {
    #[must_use]
    pub fn new(explanation_id: &str, reference: PassageReference) -> Self {
        Self {
            explanation_id: explanation_id.to_string(),
            book: reference.book,
            start_chapter: reference.start_chapter,
            start_verse: reference.start_verse,
            end_chapter: reference.end_chapter,
            end_verse: reference.end_verse,
            ref_citation: reference.citation_text,
            granularity: reference.granularity,
        }
    }

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

/// Extract the citations of `body` as mention rows for `explanation_id`.
#[must_use]
pub fn mentions_for(explanation_id: &str, body: &str) -> Vec<PassageMention> {
    let mentions: Vec<_> = reference::extract(body)
        .map(|reference| PassageMention::new(explanation_id, reference))
        .collect();
    debug!(
        explanation_id,
        count = mentions.len(),
        "extracted passage mentions"
    );
    mentions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::CanonicalBook;

    #[test]
    fn mentions_carry_parent_id_and_citation() {
        let mentions = mentions_for("exp-7", "Compare Jn 1:1-5 with Gen 1.");
        assert_eq!(mentions.len(), 2);
        assert!(mentions.iter().all(|m| m.explanation_id == "exp-7"));

        assert_eq!(mentions[0].book, BookName::Canonical(CanonicalBook::John));
        assert_eq!(mentions[0].granularity, Granularity::Range);
        assert_eq!(mentions[0].ref_citation, "Compare Jn 1:1-5");

        assert_eq!(mentions[1].book, BookName::Canonical(CanonicalBook::Genesis));
        assert_eq!(mentions[1].granularity, Granularity::Chapter);
        assert_eq!(mentions[0].span().to_string(), "John 1:1–5");
    }

    #[test]
    fn body_without_citations_has_no_mentions() {
        assert!(mentions_for("exp-1", "A reflection on grace.").is_empty());
    }

    #[test]
    fn mention_serializes_with_row_field_names() {
        let mention = mentions_for("42", "Ps 23").remove(0);
        let value = serde_json::to_value(&mention).expect("serialize");
        assert_eq!(value["explanation_id"], "42");
        assert_eq!(value["book"], "Psalms");
        assert_eq!(value["ref_citation"], "Ps 23");
        assert_eq!(value["granularity"], "chapter");
        assert!(value["start_verse"].is_null());
    }
}

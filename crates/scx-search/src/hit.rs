//! Hit rows exchanged with the search collaborators, and the fused result.

use scx_core::PassageSpan;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of the explanation a hit belongs to.
///
/// Stores keep these as integers or strings; both deserialize to the same
/// textual form, so `42` and `"42"` name one explanation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExplanationId(String);

impl ExplanationId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExplanationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExplanationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for ExplanationId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for ExplanationId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ExplanationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Signed(i64),
            Unsigned(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Signed(id) => Self(id.to_string()),
            Raw::Unsigned(id) => Self(id.to_string()),
            Raw::Text(id) => Self(id),
        })
    }
}

/// Passage bounds as they arrive from a store. `end_chapter` may be omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub book: String,
    pub start_chapter: u16,
    #[serde(default)]
    pub start_verse: Option<u16>,
    #[serde(default)]
    pub end_chapter: Option<u16>,
    #[serde(default)]
    pub end_verse: Option<u16>,
}

impl Passage {
    /// The fusion identity of this passage.
    #[must_use]
    pub fn key(&self) -> PassageKey {
        PassageKey {
            book: self.book.clone(),
            start_chapter: self.start_chapter,
            start_verse: self.start_verse,
            end_chapter: self.end_chapter.unwrap_or(self.start_chapter),
            end_verse: self.end_verse,
        }
    }

    #[must_use]
    pub fn span(&self) -> PassageSpan<'_> {
        PassageSpan {
            book: &self.book,
            start_chapter: self.start_chapter,
            start_verse: self.start_verse,
            end_chapter: self.end_chapter,
            end_verse: self.end_verse,
            granularity: None,
        }
    }
}

/// Identity used to merge hits across channels.
///
/// An absent verse is `None`, which never equals any real verse number, and
/// a missing end chapter is folded to the start chapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PassageKey {
    pub book: String,
    pub start_chapter: u16,
    pub start_verse: Option<u16>,
    pub end_chapter: u16,
    pub end_verse: Option<u16>,
}

/// Optional display metadata carried by hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitMeta {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl HitMeta {
    /// Fill absent fields from `other`; present fields are never replaced.
    pub fn backfill(&mut self, other: &Self) {
        fill(&mut self.title, other.title.as_ref());
        fill(&mut self.author, other.author.as_ref());
        fill(&mut self.snippet, other.snippet.as_ref());
    }
}

fn fill<T: Clone>(slot: &mut Option<T>, value: Option<&T>) {
    if slot.is_none() {
        *slot = value.cloned();
    }
}

/// A row from the lexical (full-text) provider. Higher `rank` is better.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalHit {
    #[serde(flatten)]
    pub passage: Passage,
    pub rank: f64,
    #[serde(default)]
    pub explanation_id: Option<ExplanationId>,
    #[serde(flatten)]
    pub meta: HitMeta,
}

/// A row from the vector provider. Lower `dist` is better; `None` is unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorHit {
    #[serde(flatten)]
    pub passage: Passage,
    #[serde(default)]
    pub dist: Option<f64>,
    #[serde(default)]
    pub explanation_id: Option<ExplanationId>,
    #[serde(flatten)]
    pub meta: HitMeta,
}

/// One ranked search result.
///
/// `fts` and `vec` are the normalized channel scores; a channel that did not
/// return the passage scores 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FusedHit {
    #[serde(flatten)]
    pub passage: Passage,
    pub explanation_id: Option<ExplanationId>,
    #[serde(flatten)]
    pub meta: HitMeta,
    pub rank: Option<f64>,
    pub dist: Option<f64>,
    #[serde(rename = "_fts")]
    pub fts: f64,
    #[serde(rename = "_vec")]
    pub vec: f64,
    pub score: f64,
    pub body: Option<String>,
}

impl FusedHit {
    pub(crate) fn from_lexical(hit: LexicalHit, fts: f64) -> Self {
        Self {
            passage: hit.passage,
            explanation_id: hit.explanation_id,
            meta: hit.meta,
            rank: Some(hit.rank),
            dist: None,
            fts,
            vec: 0.0,
            score: 0.0,
            body: None,
        }
    }

    pub(crate) fn from_vector(hit: VectorHit, vec: f64) -> Self {
        Self {
            passage: hit.passage,
            explanation_id: hit.explanation_id,
            meta: hit.meta,
            rank: None,
            dist: hit.dist,
            fts: 0.0,
            vec,
            score: 0.0,
            body: None,
        }
    }

    /// Record the vector channel for a passage the lexical channel already found.
    pub(crate) fn absorb_vector(&mut self, hit: &VectorHit, vec: f64) {
        self.vec = vec;
        self.dist = hit.dist;
        if self.explanation_id.is_none() {
            self.explanation_id.clone_from(&hit.explanation_id);
        }
        self.meta.backfill(&hit.meta);
    }
}

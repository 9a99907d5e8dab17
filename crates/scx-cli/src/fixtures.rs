//! JSON-file stand-ins for the search stores.
//!
//! Each file holds what a store would return for the query: a JSON array of
//! lexical rows, vector rows, or `{id, body}` pairs. Book and author
//! preferences are applied as case-insensitive equality filters.

use anyhow::{Context, Result};
use scx_search::hit::HitMeta;
use scx_search::{
    BodyLookup, Embedder, ExplanationId, LexicalHit, LexicalSearch, Passage, SearchFilters,
    VectorHit, VectorSearch,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;

/// Why a fixture file could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    Read(anyhow::Error),
    Parse(anyhow::Error),
}

impl LoadError {
    pub fn into_inner(self) -> anyhow::Error {
        match self {
            Self::Read(e) | Self::Parse(e) => e,
        }
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> std::result::Result<T, LoadError> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))
        .map_err(LoadError::Read)?;
    serde_json::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))
        .map_err(LoadError::Parse)
}

fn matches_filters(passage: &Passage, meta: &HitMeta, filters: &SearchFilters) -> bool {
    let same = |wanted: Option<&String>, actual: Option<&str>| {
        wanted.is_none_or(|w| actual.is_some_and(|a| a.eq_ignore_ascii_case(w)))
    };
    same(filters.prefer_book.as_ref(), Some(passage.book.as_str()))
        && same(filters.prefer_author.as_ref(), meta.author.as_deref())
}

pub struct FileLexical {
    hits: Vec<LexicalHit>,
}

impl FileLexical {
    pub fn load(path: &Path) -> std::result::Result<Self, LoadError> {
        Ok(Self {
            hits: load_json(path)?,
        })
    }
}

impl LexicalSearch for FileLexical {
    fn search(&self, _expression: &str, filters: &SearchFilters) -> Result<Vec<LexicalHit>> {
        Ok(self
            .hits
            .iter()
            .filter(|hit| matches_filters(&hit.passage, &hit.meta, filters))
            .cloned()
            .collect())
    }
}

pub struct FileVector {
    hits: Vec<VectorHit>,
}

impl FileVector {
    pub fn load(path: &Path) -> std::result::Result<Self, LoadError> {
        Ok(Self {
            hits: load_json(path)?,
        })
    }
}

impl VectorSearch for FileVector {
    fn search(&self, _embedding: &[f32], filters: &SearchFilters) -> Result<Vec<VectorHit>> {
        Ok(self
            .hits
            .iter()
            .filter(|hit| matches_filters(&hit.passage, &hit.meta, filters))
            .cloned()
            .collect())
    }
}

/// Embedder for file-backed vector rows, which are already ranked for the
/// query and ignore the embedding.
pub struct NoopEmbedder;

impl Embedder for NoopEmbedder {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(Vec::new())
    }
}

#[derive(Deserialize)]
struct BodyRow {
    id: ExplanationId,
    body: String,
}

pub struct FileBodies {
    bodies: HashMap<ExplanationId, String>,
}

impl FileBodies {
    pub fn load(path: &Path) -> std::result::Result<Self, LoadError> {
        let rows: Vec<BodyRow> = load_json(path)?;
        Ok(Self {
            bodies: rows.into_iter().map(|row| (row.id, row.body)).collect(),
        })
    }
}

impl BodyLookup for FileBodies {
    fn bodies(&self, ids: &[ExplanationId]) -> Result<HashMap<ExplanationId, String>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.bodies.get(id).map(|body| (id.clone(), body.clone())))
            .collect())
    }
}

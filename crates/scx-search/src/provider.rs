//! Collaborator contracts for the stores behind a search.
//!
//! Implementations live outside this crate (a database, an embedding service,
//! or the CLI's JSON fixtures). They are `Send + Sync` so the orchestrator can
//! run the vector branch on a scoped thread.

use crate::hit::{ExplanationId, LexicalHit, VectorHit};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Optional preferences passed unchanged to both search channels.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub prefer_book: Option<String>,
    pub prefer_author: Option<String>,
}

impl SearchFilters {
    /// Blank or whitespace-only values are treated as absent.
    #[must_use]
    pub fn new(prefer_book: Option<&str>, prefer_author: Option<&str>) -> Self {
        Self {
            prefer_book: non_blank(prefer_book),
            prefer_author: non_blank(prefer_author),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.prefer_book.is_none() && self.prefer_author.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Full-text search over explanations.
pub trait LexicalSearch: Send + Sync {
    /// `expression` is an OR-joined term list, see
    /// [`QueryTerms::lexical_expression`](crate::query::QueryTerms::lexical_expression).
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    fn search(&self, expression: &str, filters: &SearchFilters) -> Result<Vec<LexicalHit>>;
}

/// Nearest-neighbour search over explanation embeddings.
pub trait VectorSearch: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the index is unavailable. Callers treat it as an empty channel.
    fn search(&self, embedding: &[f32], filters: &SearchFilters) -> Result<Vec<VectorHit>>;
}

/// Converts query text to an embedding vector.
pub trait Embedder: Send + Sync {
    /// # Errors
    ///
    /// Returns an error for missing credentials or a failed request.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Looks up full explanation bodies. Unknown ids are simply absent.
pub trait BodyLookup: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the lookup fails as a whole.
    fn bodies(&self, ids: &[ExplanationId]) -> Result<HashMap<ExplanationId, String>>;
}

//! Hybrid search orchestration across the lexical and vector channels.
//!
//! The orchestrator degrades gracefully:
//! - the lexical channel always runs, and its failure is the only fatal one
//! - the vector channel runs only with an embedder and a vector store, and
//!   any embed/search failure (or panic) reduces to lexical-only scoring
//! - body enrichment runs after ranking and never fails the request

use crate::enrich::enrich_bodies;
use crate::fusion::{FusionConfig, FusionWeights, fuse, significant_len};
use crate::hit::{FusedHit, LexicalHit, VectorHit};
use crate::provider::{BodyLookup, Embedder, LexicalSearch, SearchFilters, VectorSearch};
use crate::query::QueryTerms;
use scx_core::config::ProjectConfig;
use scx_core::timing::timed;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("lexical search failed: {source:#}")]
    Lexical {
        #[source]
        source: anyhow::Error,
    },
}

/// The stores a search reads from. Only the lexical store is required.
#[derive(Clone, Copy)]
pub struct Providers<'a> {
    pub lexical: &'a dyn LexicalSearch,
    pub vector: Option<&'a dyn VectorSearch>,
    pub embedder: Option<&'a dyn Embedder>,
    pub bodies: Option<&'a dyn BodyLookup>,
}

impl<'a> Providers<'a> {
    #[must_use]
    pub fn lexical_only(lexical: &'a dyn LexicalSearch) -> Self {
        Self {
            lexical,
            vector: None,
            embedder: None,
            bodies: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub filters: SearchFilters,
}

impl SearchRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filters: SearchFilters::default(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub q: String,
    pub terms: Vec<String>,
    /// Configured weights, before any short-query demotion.
    pub weights: FusionWeights,
    pub results: Vec<FusedHit>,
}

/// Run one search: fetch both channels, fuse, then attach bodies.
///
/// The vector channel and body lookup degrade to empty on failure.
///
/// # Errors
///
/// Returns [`SearchError::EmptyQuery`] for a blank query and
/// [`SearchError::Lexical`] when the lexical store fails.
pub fn search(
    request: &SearchRequest,
    providers: Providers<'_>,
    config: &ProjectConfig,
) -> Result<SearchResponse, SearchError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }

    let terms = QueryTerms::parse(query);
    let expression = terms.lexical_expression(config.search.prefix_min_len);
    let fusion = FusionConfig::from(&config.search);

    let vector_branch = match (config.search.semantic, providers.embedder, providers.vector) {
        (true, Some(embedder), Some(vector)) => Some((embedder, vector)),
        (true, None, Some(_)) => {
            warn!("no embedder available, falling back to lexical-only fusion");
            None
        }
        _ => None,
    };

    let (lexical, vector) = timed("search.fetch", || {
        std::thread::scope(|scope| {
            let handle = vector_branch.map(|(embedder, store)| {
                scope.spawn(move || {
                    timed("search.vector", || {
                        fetch_vector(embedder, store, query, &request.filters)
                    })
                })
            });

            let lexical = timed("search.lexical", || {
                fetch_lexical(providers.lexical, expression.as_deref(), &request.filters)
            });

            let vector = handle.map_or_else(Vec::new, |handle| {
                handle.join().unwrap_or_else(|_| {
                    warn!("vector search panicked, falling back to lexical-only fusion");
                    Vec::new()
                })
            });
            (lexical, vector)
        })
    });
    let lexical = lexical.map_err(|source| SearchError::Lexical { source })?;
    debug!(lexical = lexical.len(), vector = vector.len(), "fetched hits");

    let mut results = timed("search.fuse", || {
        fuse(lexical, vector, &fusion, significant_len(query))
    });
    log_top(&results);

    if let Some(bodies) = providers.bodies {
        timed("search.enrich", || {
            enrich_bodies(&mut results, bodies, &config.enrich);
        });
    }

    Ok(SearchResponse {
        q: query.to_string(),
        terms: terms.into_terms(),
        weights: fusion.weights,
        results,
    })
}

fn fetch_lexical(
    store: &dyn LexicalSearch,
    expression: Option<&str>,
    filters: &SearchFilters,
) -> anyhow::Result<Vec<LexicalHit>> {
    // A query with no usable terms has nothing to match lexically.
    let Some(expression) = expression else {
        return Ok(Vec::new());
    };
    store.search(expression, filters)
}

fn fetch_vector(
    embedder: &dyn Embedder,
    store: &dyn VectorSearch,
    query: &str,
    filters: &SearchFilters,
) -> Vec<VectorHit> {
    match embedder
        .embed(query)
        .and_then(|embedding| store.search(&embedding, filters))
    {
        Ok(hits) => hits,
        Err(e) => {
            warn!("vector channel unavailable, falling back to lexical-only fusion: {e:#}");
            Vec::new()
        }
    }
}

fn log_top(results: &[FusedHit]) {
    for (position, hit) in results.iter().take(3).enumerate() {
        debug!(
            position,
            passage = %hit.passage.span(),
            rank = ?hit.rank,
            dist = ?hit.dist,
            fts = hit.fts,
            vec = hit.vec,
            score = hit.score,
            "fused hit"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::{HitMeta, Passage};
    use anyhow::Result;
    use std::sync::Mutex;

    struct RecordingLexical {
        expressions: Mutex<Vec<String>>,
    }

    impl LexicalSearch for RecordingLexical {
        fn search(&self, expression: &str, _filters: &SearchFilters) -> Result<Vec<LexicalHit>> {
            self.expressions
                .lock()
                .expect("lock")
                .push(expression.to_string());
            Ok(vec![LexicalHit {
                passage: Passage {
                    book: "John".into(),
                    start_chapter: 1,
                    start_verse: Some(1),
                    end_chapter: Some(1),
                    end_verse: Some(1),
                },
                rank: 0.3,
                explanation_id: Some("1".into()),
                meta: HitMeta::default(),
            }])
        }
    }

    fn recording() -> RecordingLexical {
        RecordingLexical {
            expressions: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn blank_query_is_rejected() {
        let lexical = recording();
        let err = search(
            &SearchRequest::new("   "),
            Providers::lexical_only(&lexical),
            &ProjectConfig::default(),
        )
        .expect_err("blank query must fail");
        assert!(matches!(err, SearchError::EmptyQuery));
        assert!(lexical.expressions.lock().expect("lock").is_empty());
    }

    #[test]
    fn lexical_store_receives_prefix_expression() {
        let lexical = recording();
        let response = search(
            &SearchRequest::new("Word made flesh"),
            Providers::lexical_only(&lexical),
            &ProjectConfig::default(),
        )
        .expect("search");

        assert_eq!(
            lexical.expressions.lock().expect("lock").as_slice(),
            ["word:* | made:* | flesh:*"]
        );
        assert_eq!(response.terms, ["word", "made", "flesh"]);
        assert_eq!(response.q, "Word made flesh");
        assert_eq!(response.results.len(), 1);
        assert!((response.results[0].score - 0.55).abs() < 1e-12);
    }

    #[test]
    fn termless_query_skips_lexical_store() {
        let lexical = recording();
        let response = search(
            &SearchRequest::new("?!"),
            Providers::lexical_only(&lexical),
            &ProjectConfig::default(),
        )
        .expect("search");
        assert!(response.terms.is_empty());
        assert!(response.results.is_empty());
        assert!(lexical.expressions.lock().expect("lock").is_empty());
    }

    #[test]
    fn response_serializes_with_weight_echo() {
        let lexical = recording();
        let response = search(
            &SearchRequest::new("joy"),
            Providers::lexical_only(&lexical),
            &ProjectConfig::default(),
        )
        .expect("search");
        let value = serde_json::to_value(&response).expect("serialize");
        assert_eq!(value["q"], "joy");
        assert_eq!(value["weights"]["fts"], 0.55);
        assert_eq!(value["weights"]["vector"], 0.45);
        assert_eq!(value["results"][0]["book"], "John");
        assert!(value["results"][0].get("_fts").is_some());
    }
}

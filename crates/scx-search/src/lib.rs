#![forbid(unsafe_code)]
//! scx-search library.
//!
//! Hybrid passage search: lexical ranks and vector distances are normalized
//! per channel, merged by passage identity, and combined with configurable
//! weights into one bounded, score-ordered list.
//!
//! # Conventions
//!
//! - **Errors**: collaborators return `anyhow::Result`; [`hybrid::SearchError`]
//!   is the typed error callers match on.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod enrich;
pub mod fusion;
pub mod hit;
pub mod hybrid;
pub mod normalize;
pub mod provider;
pub mod query;

pub use fusion::{FusionConfig, FusionWeights, fuse};
pub use hit::{ExplanationId, FusedHit, LexicalHit, Passage, PassageKey, VectorHit};
pub use hybrid::{Providers, SearchError, SearchRequest, SearchResponse, search};
pub use provider::{BodyLookup, Embedder, LexicalSearch, SearchFilters, VectorSearch};

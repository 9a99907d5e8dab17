//! scx-core library.
//!
//! Citation extraction ([`reference`]), book alias resolution ([`book`]),
//! mention rows for ingestion ([`ingest`]), and the shared configuration,
//! error-code, and timing plumbing used by the search and CLI crates.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at module seams, `anyhow::Result` at the edges.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

#![forbid(unsafe_code)]

pub mod book;
pub mod config;
pub mod error;
pub mod ingest;
pub mod passage;
pub mod reference;
pub mod timing;

pub use book::{BookName, CanonicalBook};
pub use ingest::{PassageMention, mentions_for};
pub use passage::{Granularity, PassageReference, PassageSpan};
pub use reference::{extract, extract_references};

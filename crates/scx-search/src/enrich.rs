//! Body enrichment for ranked hits.
//!
//! Runs after ranking and never changes order or scores. Any failure leaves
//! bodies as `None`.

use crate::hit::{ExplanationId, FusedHit};
use crate::provider::BodyLookup;
use scx_core::config::EnrichConfig;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Attach explanation bodies to `hits`, truncated to the configured budget.
pub fn enrich_bodies(hits: &mut [FusedHit], lookup: &dyn BodyLookup, config: &EnrichConfig) {
    let mut seen = HashSet::new();
    let ids: Vec<ExplanationId> = hits
        .iter()
        .filter_map(|hit| hit.explanation_id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect();
    if ids.is_empty() {
        return;
    }

    let bodies = match lookup.bodies(&ids) {
        Ok(bodies) => bodies,
        Err(e) => {
            warn!("body lookup failed, returning results without bodies: {e:#}");
            return;
        }
    };
    debug!(requested = ids.len(), found = bodies.len(), "looked up bodies");

    for hit in hits {
        hit.body = hit
            .explanation_id
            .as_ref()
            .and_then(|id| bodies.get(id))
            .map(|body| truncate_body(body, config));
    }
}

/// Cut `body` to `max_body_chars` characters and append the marker when cut.
#[must_use]
pub fn truncate_body(body: &str, config: &EnrichConfig) -> String {
    match body.char_indices().nth(config.max_body_chars) {
        Some((cut, _)) => format!("{}{}", &body[..cut], config.truncation_marker),
        None => body.to_string(),
    }
}

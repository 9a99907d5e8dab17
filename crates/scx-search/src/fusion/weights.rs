use crate::normalize::NormalizerConfig;
use scx_core::config::SearchConfig;
use serde::{Deserialize, Serialize};

/// Linear channel weights: `score = fts * _fts + vector * _vec`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FusionWeights {
    pub fts: f64,
    pub vector: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            fts: search.weight_fts,
            vector: search.weight_vec,
        }
    }
}

impl FusionWeights {
    #[must_use]
    pub fn combine(self, fts: f64, vector: f64) -> f64 {
        crate::normalize::clamp_unit(self.fts.mul_add(fts, self.vector * vector))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FusionConfig {
    pub weights: FusionWeights,
    /// Queries with fewer significant characters than this are "short".
    pub short_query_min_chars: usize,
    /// Vector weight multiplier for short queries.
    pub short_query_vec_factor: f64,
    pub max_results: usize,
    pub normalizer: NormalizerConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for FusionConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            weights: FusionWeights {
                fts: config.weight_fts,
                vector: config.weight_vec,
            },
            short_query_min_chars: config.short_query_min_chars,
            short_query_vec_factor: config.short_query_vec_factor,
            max_results: config.max_results,
            normalizer: NormalizerConfig::from(config),
        }
    }
}

impl FusionConfig {
    #[must_use]
    pub const fn is_short_query(&self, query_len: usize) -> bool {
        query_len < self.short_query_min_chars
    }

    /// Weights actually applied for a query of `query_len` significant characters.
    ///
    /// Short queries keep the lexical weight and scale the vector weight down.
    #[must_use]
    pub fn effective_weights(&self, query_len: usize) -> FusionWeights {
        if self.is_short_query(query_len) {
            FusionWeights {
                fts: self.weights.fts,
                vector: self.weights.vector * self.short_query_vec_factor,
            }
        } else {
            self.weights
        }
    }
}

/// Number of ASCII word characters in `query` (`[A-Za-z0-9_]`).
///
/// Accented and non-Latin letters do not count, so `"ñoño"` has length 2.
#[must_use]
pub fn significant_len(query: &str) -> usize {
    query
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .count()
}

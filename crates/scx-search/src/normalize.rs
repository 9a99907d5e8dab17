//! Per-channel score normalization into `[0, 1]`.
//!
//! | channel | raw input              | normalized                                  |
//! |---------|------------------------|---------------------------------------------|
//! | lexical | rank, higher is better | `rank / max(max_rank, epsilon)`             |
//! | vector  | distance, lower better | `1 - (d - d_min) / (d_max - d_min)`          |
//!
//! Non-finite inputs score 0. A distance spread at or below the configured
//! minimum scores every row 0 instead of dividing by a near-zero spread.

use scx_core::config::SearchConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerConfig {
    pub rank_epsilon: f64,
    pub min_distance_spread: f64,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for NormalizerConfig {
    fn from(config: &SearchConfig) -> Self {
        Self {
            rank_epsilon: config.rank_epsilon,
            min_distance_spread: config.min_distance_spread,
        }
    }
}

/// Normalize lexical ranks against the largest rank in the set.
#[must_use]
pub fn normalize_ranks(ranks: &[f64], config: &NormalizerConfig) -> Vec<f64> {
    let max_rank = ranks
        .iter()
        .copied()
        .filter(|rank| rank.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    let denominator = max_rank.max(config.rank_epsilon);

    ranks
        .iter()
        .map(|&rank| {
            if rank.is_finite() {
                clamp_unit(rank / denominator)
            } else {
                0.0
            }
        })
        .collect()
}

/// Convert vector distances to similarities via min-max scaling.
#[must_use]
pub fn normalize_distances(distances: &[Option<f64>], config: &NormalizerConfig) -> Vec<f64> {
    let finite = || distances.iter().flatten().copied().filter(|d| d.is_finite());
    let d_min = finite().fold(f64::INFINITY, f64::min);
    let d_max = finite().fold(f64::NEG_INFINITY, f64::max);
    let spread = d_max - d_min;
    // With no finite distance the spread is -inf and this is false.
    let usable = spread > config.min_distance_spread;

    distances
        .iter()
        .map(|dist| match dist {
            Some(d) if d.is_finite() && usable => clamp_unit(1.0 - (d - d_min) / spread),
            _ => 0.0,
        })
        .collect()
}

pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

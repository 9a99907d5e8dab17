//! Weighted fusion of the lexical and vector channels.
//!
//! Both channels are normalized into `[0, 1]` (see [`crate::normalize`]),
//! merged on [`PassageKey`](crate::hit::PassageKey) and combined linearly:
//!
//! ```text
//! score = w_fts * _fts + w_vec * _vec
//! ```
//!
//! Queries with fewer than `short_query_min_chars` word characters scale
//! `w_vec` by `short_query_vec_factor`, since very short queries give broad,
//! noisy nearest neighbours.

mod merge;
mod weights;

pub use merge::fuse;
pub use weights::{FusionConfig, FusionWeights, significant_len};

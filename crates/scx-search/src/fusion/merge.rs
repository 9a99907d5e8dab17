use super::weights::FusionConfig;
use crate::hit::{FusedHit, LexicalHit, PassageKey, VectorHit};
use crate::normalize::{normalize_distances, normalize_ranks};
use std::collections::HashMap;

/// Merge lexical and vector hits by passage identity into a ranked list.
///
/// - Lexical hits seed the table with `_vec = 0`.
/// - A vector hit on a known passage sets only `_vec` (plus `dist`) and fills
///   absent metadata; a new passage enters with `_fts = 0`.
/// - Scores combine with the weights for `query_len`; the sort is stable, so
///   ties keep insertion order (lexical-seeded before vector-only).
/// - The cap applies after scoring.
///
/// A repeated passage within one channel replaces the earlier row in place.
#[must_use]
pub fn fuse(
    lexical: Vec<LexicalHit>,
    vector: Vec<VectorHit>,
    config: &FusionConfig,
    query_len: usize,
) -> Vec<FusedHit> {
    let ranks: Vec<f64> = lexical.iter().map(|hit| hit.rank).collect();
    let fts_scores = normalize_ranks(&ranks, &config.normalizer);
    let distances: Vec<Option<f64>> = vector.iter().map(|hit| hit.dist).collect();
    let vec_scores = normalize_distances(&distances, &config.normalizer);

    let mut index: HashMap<PassageKey, usize> = HashMap::with_capacity(lexical.len() + vector.len());
    let mut merged: Vec<FusedHit> = Vec::with_capacity(lexical.len() + vector.len());

    for (hit, fts) in lexical.into_iter().zip(fts_scores) {
        let key = hit.passage.key();
        let fused = FusedHit::from_lexical(hit, fts);
        match index.get(&key) {
            Some(&slot) => merged[slot] = fused,
            None => {
                index.insert(key, merged.len());
                merged.push(fused);
            }
        }
    }

    for (hit, vec) in vector.into_iter().zip(vec_scores) {
        let key = hit.passage.key();
        match index.get(&key) {
            Some(&slot) => merged[slot].absorb_vector(&hit, vec),
            None => {
                index.insert(key, merged.len());
                merged.push(FusedHit::from_vector(hit, vec));
            }
        }
    }

    let weights = config.effective_weights(query_len);
    for hit in &mut merged {
        hit.score = weights.combine(hit.fts, hit.vec);
    }

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(config.max_results);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::FusionWeights;
    use crate::hit::{HitMeta, Passage};
    use proptest::prelude::*;

    fn passage(book: &str, chapter: u16, verse: Option<u16>) -> Passage {
        Passage {
            book: book.to_string(),
            start_chapter: chapter,
            start_verse: verse,
            end_chapter: Some(chapter),
            end_verse: verse,
        }
    }

    fn lex(book: &str, chapter: u16, rank: f64) -> LexicalHit {
        LexicalHit {
            passage: passage(book, chapter, None),
            rank,
            explanation_id: Some(format!("{book}-{chapter}").as_str().into()),
            meta: HitMeta::default(),
        }
    }

    fn vect(book: &str, chapter: u16, dist: f64) -> VectorHit {
        VectorHit {
            passage: passage(book, chapter, None),
            dist: Some(dist),
            explanation_id: None,
            meta: HitMeta {
                title: Some(format!("{book} title")),
                author: Some("Chrysostom".to_string()),
                snippet: None,
            },
        }
    }

    const LONG: usize = 10;

    #[test]
    fn shared_passage_carries_both_channels() {
        let fused = fuse(
            vec![lex("John", 1, 1.0), lex("John", 2, 0.5)],
            vec![vect("John", 1, 0.1), vect("Mark", 1, 0.5)],
            &FusionConfig::default(),
            LONG,
        );

        assert_eq!(fused.len(), 3);
        let john1 = &fused[0];
        assert_eq!(john1.passage.book, "John");
        assert!((john1.fts - 1.0).abs() < 1e-12);
        assert!((john1.vec - 1.0).abs() < 1e-12);
        assert!((john1.score - 1.0).abs() < 1e-12);
        assert_eq!(john1.dist, Some(0.1));
        assert_eq!(john1.rank, Some(1.0));
    }

    #[test]
    fn vector_only_hit_has_zero_lexical_score() {
        let fused = fuse(vec![], vec![vect("Mark", 1, 0.1), vect("Mark", 2, 0.9)], &FusionConfig::default(), LONG);
        assert!(fused.iter().all(|hit| hit.fts == 0.0));
        assert!(fused.iter().all(|hit| hit.rank.is_none()));
        assert!((fused[0].score - 0.45).abs() < 1e-12);
    }

    #[test]
    fn merge_backfills_metadata_without_overwriting() {
        let mut lexical = lex("John", 1, 1.0);
        lexical.meta.title = Some("In the beginning".to_string());

        let fused = fuse(vec![lexical], vec![vect("John", 1, 0.2)], &FusionConfig::default(), LONG);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].meta.title.as_deref(), Some("In the beginning"));
        assert_eq!(fused[0].meta.author.as_deref(), Some("Chrysostom"));
        assert_eq!(fused[0].explanation_id.as_ref().map(|id| id.as_str()), Some("John-1"));
    }

    #[test]
    fn equal_scores_keep_insertion_order() {
        let fused = fuse(
            vec![lex("Ruth", 1, 0.0), lex("Jude", 1, 0.0)],
            vec![vect("Job", 1, 0.5), vect("Job", 2, 0.5)],
            &FusionConfig::default(),
            LONG,
        );
        let books: Vec<_> = fused.iter().map(|hit| (hit.passage.book.as_str(), hit.passage.start_chapter)).collect();
        assert_eq!(books, vec![("Ruth", 1), ("Jude", 1), ("Job", 1), ("Job", 2)]);
        assert!(fused.iter().all(|hit| hit.score == 0.0));
    }

    #[test]
    fn missing_vector_channel_is_lexical_only() {
        let fused = fuse(vec![lex("Acts", 2, 4.0), lex("Acts", 1, 2.0)], vec![], &FusionConfig::default(), LONG);
        assert!((fused[0].score - 0.55).abs() < 1e-12);
        assert!((fused[1].score - 0.275).abs() < 1e-12);
        assert!(fused.iter().all(|hit| hit.vec == 0.0 && hit.dist.is_none()));
    }

    #[test]
    fn short_query_changes_score_when_vector_contributes() {
        let lexical = vec![lex("John", 1, 1.0)];
        let vector = vec![vect("John", 1, 0.1), vect("John", 2, 0.3)];
        let config = FusionConfig::default();

        let long = fuse(lexical.clone(), vector.clone(), &config, 4);
        let short = fuse(lexical, vector, &config, 3);
        assert!((long[0].score - 1.0).abs() < 1e-12);
        assert!((short[0].score - (0.55 + 0.45 * 0.2)).abs() < 1e-12);
        assert!(short[0].score < long[0].score);
    }

    #[test]
    fn cap_applies_after_scoring() {
        let config = FusionConfig {
            max_results: 2,
            ..FusionConfig::default()
        };
        let fused = fuse(
            vec![lex("Gen", 1, 0.1), lex("Gen", 2, 0.2), lex("Gen", 3, 0.9)],
            vec![],
            &config,
            LONG,
        );
        let chapters: Vec<_> = fused.iter().map(|hit| hit.passage.start_chapter).collect();
        assert_eq!(chapters, vec![3, 2]);
    }

    #[test]
    fn repeated_lexical_passage_keeps_one_entry() {
        let fused = fuse(vec![lex("Gen", 1, 0.2), lex("Gen", 1, 0.4)], vec![], &FusionConfig::default(), LONG);
        assert_eq!(fused.len(), 1);
        assert_eq!(fused[0].rank, Some(0.4));
    }

    fn arb_lexical() -> impl Strategy<Value = Vec<LexicalHit>> {
        prop::collection::vec((1_u16..30, 0.0_f64..5.0), 0..80).prop_map(|rows| {
            rows.into_iter()
                .map(|(chapter, rank)| lex("Psalms", chapter, rank))
                .collect()
        })
    }

    fn arb_vector() -> impl Strategy<Value = Vec<VectorHit>> {
        prop::collection::vec((1_u16..60, prop::option::of(0.0_f64..2.0)), 0..80).prop_map(|rows| {
            rows.into_iter()
                .map(|(chapter, dist)| VectorHit {
                    dist,
                    ..vect("Psalms", chapter, 0.0)
                })
                .collect()
        })
    }

    fn arb_weights() -> impl Strategy<Value = FusionWeights> {
        (0.0_f64..=1.0, 0.0_f64..=1.0).prop_map(|(fts, share)| FusionWeights {
            fts,
            vector: (1.0 - fts) * share,
        })
    }

    proptest! {
        #[test]
        fn fused_list_is_bounded_sorted_and_in_range(
            lexical in arb_lexical(),
            vector in arb_vector(),
            weights in arb_weights(),
            query_len in 0_usize..12,
        ) {
            let config = FusionConfig { weights, ..FusionConfig::default() };
            let fused = fuse(lexical, vector, &config, query_len);

            prop_assert!(fused.len() <= 50);
            for hit in &fused {
                prop_assert!((0.0..=1.0).contains(&hit.score));
                prop_assert!((0.0..=1.0).contains(&hit.fts));
                prop_assert!((0.0..=1.0).contains(&hit.vec));
            }
            for pair in fused.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
            }
        }

        #[test]
        fn higher_rank_never_scores_lower_at_equal_vector_score(
            lexical in arb_lexical(),
            weights in arb_weights(),
        ) {
            let config = FusionConfig { weights, max_results: usize::MAX, ..FusionConfig::default() };
            let fused = fuse(lexical, vec![], &config, 10);
            for a in &fused {
                for b in &fused {
                    if a.rank >= b.rank {
                        prop_assert!(a.score >= b.score);
                    }
                }
            }
        }

        #[test]
        fn lower_distance_never_scores_lower_at_equal_lexical_score(
            vector in arb_vector(),
            weights in arb_weights(),
        ) {
            let config = FusionConfig { weights, max_results: usize::MAX, ..FusionConfig::default() };
            let fused = fuse(vec![], vector, &config, 10);
            for a in &fused {
                for b in &fused {
                    if let (Some(da), Some(db)) = (a.dist, b.dist) {
                        if da <= db {
                            prop_assert!(a.score >= b.score);
                        }
                    }
                }
            }
        }
    }
}

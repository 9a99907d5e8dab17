#![no_main]

use libfuzzer_sys::fuzz_target;
use scx_search::{FusionConfig, LexicalHit, VectorHit, fuse};

fuzz_target!(|data: &[u8]| {
    let Some(split) = data.iter().position(|&b| b == 0) else {
        return;
    };
    let (Ok(lexical), Ok(vector)) = (
        serde_json::from_slice::<Vec<LexicalHit>>(&data[..split]),
        serde_json::from_slice::<Vec<VectorHit>>(&data[split + 1..]),
    ) else {
        return;
    };

    let config = FusionConfig::default();
    let results = fuse(lexical, vector, &config, data.len());

    assert!(results.len() <= config.max_results);
    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for hit in &results {
        assert!((0.0..=1.0).contains(&hit.score));
        assert!((0.0..=1.0).contains(&hit.fts));
        assert!((0.0..=1.0).contains(&hit.vec));
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use scx_core::{Granularity, extract_references};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let mut cursor = 0;
    for reference in extract_references(text) {
        let found = text[cursor..]
            .find(&reference.citation_text)
            .expect("citation text is a substring after the previous match");
        cursor += found + reference.citation_text.len();

        assert_eq!(
            reference.granularity,
            Granularity::classify(
                reference.start_chapter,
                reference.start_verse,
                reference.end_chapter,
                reference.end_verse,
            )
        );
    }
});

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use scx_core::{extract_references, mentions_for};

const PARAGRAPH: &str = "In the beginning was the Word (Jn 1:1-5; cf. Gen 1). \
    Paul returns to the theme in 2 Cor 5:17 and again in Col 1:15–2:3, \
    while the Psalmist sings of it in Ps 19 and Ps 33:6. See also I Sam. 3:10, \
    Heb 11:3 and Rev 21:1-5. ";

fn corpus(paragraphs: usize) -> String {
    PARAGRAPH.repeat(paragraphs)
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for paragraphs in [1_usize, 16, 256] {
        let text = corpus(paragraphs);
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("references", paragraphs),
            &text,
            |b, text| b.iter(|| black_box(extract_references(text))),
        );

        group.bench_with_input(BenchmarkId::new("mentions", paragraphs), &text, |b, text| {
            b.iter(|| black_box(mentions_for("bench", text)));
        });
    }

    group.finish();
}

fn bench_prose_without_citations(c: &mut Criterion) {
    let text = "Grace is not a reward for the diligent but a gift to the undeserving. ".repeat(64);
    c.bench_function("extract.prose", |b| {
        b.iter(|| black_box(extract_references(&text)));
    });
}

criterion_group!(benches, bench_extract, bench_prose_without_citations);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spellscan::{LineIndex, TextRange};

fn sample_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("line {} has a few words in it\r\n", i))
        .collect()
}

fn bench_enumerate(c: &mut Criterion) {
    let text = sample_text(10_000);
    c.bench_function("enumerate 10k lines", |b| {
        b.iter(|| LineIndex::new(black_box(&text)).count())
    });
}

fn bench_sorted_lookups(c: &mut Criterion) {
    let text = sample_text(10_000);
    let queries: Vec<TextRange> = (0..text.len())
        .step_by(17)
        .map(|start| TextRange::new(start, 1))
        .collect();

    c.bench_function("find_line sorted queries", |b| {
        b.iter(|| {
            let mut index = LineIndex::new(&text);
            for range in &queries {
                black_box(index.find_line(*range).ok());
            }
        })
    });
}

criterion_group!(benches, bench_enumerate, bench_sorted_lookups);
criterion_main!(benches);

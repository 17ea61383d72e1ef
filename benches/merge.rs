use criterion::{black_box, criterion_group, criterion_main, Criterion};

use layoutprep::{label_document, BBox, RawAnnotation};

fn synthetic_document(token_count: usize) -> (Vec<String>, Vec<BBox>, Vec<RawAnnotation>) {
    let tokens: Vec<String> = (0..token_count).map(|i| format!("word{i}")).collect();
    let bboxes: Vec<BBox> = (0..token_count)
        .map(|i| {
            let x = (i as i32 % 20) * 60;
            let y = (i as i32 / 20) * 16;
            [x, y, x + 55, y + 14]
        })
        .collect();

    let mut starts = Vec::with_capacity(token_count);
    let mut offset = 0;
    for token in &tokens {
        starts.push(offset);
        offset += token.chars().count() + 1;
    }

    // Label every tenth pair of tokens as one two-token field.
    let mut annotations = Vec::new();
    let mut idx = 0;
    while idx + 1 < token_count {
        let span_text = format!("{} {}", tokens[idx], tokens[idx + 1]);
        annotations.push(RawAnnotation {
            start: starts[idx],
            end: starts[idx] + span_text.chars().count(),
            label: "FIELD".into(),
            text: span_text,
        });
        idx += 10;
    }

    (tokens, bboxes, annotations)
}

fn bench_label_document(c: &mut Criterion) {
    let (tokens, bboxes, annotations) = synthetic_document(600);

    c.bench_function("label_document/600_tokens", |b| {
        b.iter(|| {
            label_document(
                black_box(&tokens),
                black_box(&bboxes),
                black_box(annotations.clone()),
            )
            .expect("alignment succeeds")
        })
    });
}

criterion_group!(benches, bench_label_document);
criterion_main!(benches);

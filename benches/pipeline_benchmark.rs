//! Throughput of the decode -> parse -> reduce pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ragchat::models::Message;
use ragchat::sse::{parse_frame, LineBuffer, Utf8StreamDecoder};
use ragchat::stream::StreamProcessor;

/// A full answer body with `chunks` content frames
fn generate_body(chunks: usize) -> String {
    let mut body = String::from("data: {\"type\":\"status\",\"message\":\"Searching...\"}\n");
    for i in 0..chunks {
        body.push_str(&format!(
            "data: {{\"type\":\"content\",\"message\":\"token {} caf\u{e9} \"}}\n",
            i
        ));
    }
    body.push_str("data: {\"type\":\"done\"}\n");
    body
}

/// A short conversation history the answer is appended to
fn history(len: usize) -> Vec<Message> {
    (0..len)
        .map(|i| Message::ai(format!("h{}", i), "earlier answer"))
        .collect()
}

fn bench_processor(c: &mut Criterion) {
    let mut group = c.benchmark_group("stream_processor");

    for size in [10, 100, 1000].iter() {
        let body = generate_body(*size);
        group.throughput(Throughput::Bytes(body.len() as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_chunks", size)),
            &body,
            |b, body| {
                b.iter(|| {
                    let mut processor = StreamProcessor::new(history(20));
                    // Network-sized reads
                    for chunk in body.as_bytes().chunks(512) {
                        processor.feed_bytes(black_box(chunk));
                    }
                    processor.finish();
                    black_box(processor.into_parts())
                });
            },
        );
    }

    group.finish();
}

fn bench_line_split_and_parse(c: &mut Criterion) {
    let body = generate_body(500);
    let mut group = c.benchmark_group("lines_and_frames");
    group.throughput(Throughput::Bytes(body.len() as u64));

    group.bench_function("split_and_parse", |b| {
        b.iter(|| {
            let mut decoder = Utf8StreamDecoder::new();
            let mut buffer = LineBuffer::new();
            let mut events = 0usize;
            for chunk in body.as_bytes().chunks(64) {
                let text = decoder.decode(chunk);
                for line in buffer.feed(&text) {
                    if let Ok(Some(_)) = parse_frame(black_box(&line)) {
                        events += 1;
                    }
                }
            }
            black_box(events)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_processor, bench_line_split_and_parse);
criterion_main!(benches);

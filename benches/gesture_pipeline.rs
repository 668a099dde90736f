//! Criterion benchmarks for the per-frame hot path
//!
//! Covers: finger extraction, classification, frame parsing, ring buffer
//! push/pop_latest, and the full pipeline step.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gesture_media_control::capture::protocol::parse_frame_line;
use gesture_media_control::capture::{DetectionMessage, FrameRingBuffer, HandFrame};
use gesture_media_control::dispatch::Dispatcher;
use gesture_media_control::gesture::GestureClassifier;
use gesture_media_control::hand::landmarks::{INDEX_MCP, INDEX_PIP, INDEX_TIP, TIP_IDS};
use gesture_media_control::hand::{fingers_up, Landmark, LandmarkSet, LANDMARK_COUNT};
use gesture_media_control::sink::LogOnlySink;
use gesture_media_control::time::Timestamp;
use gesture_media_control::GesturePipeline;

fn pointing_right() -> LandmarkSet {
    let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
    points[INDEX_MCP] = Landmark::new(0.5, 0.6);
    points[INDEX_PIP] = Landmark::new(0.5, 0.55);
    points[INDEX_TIP] = Landmark::new(0.6, 0.4);
    LandmarkSet::new(points)
}

fn peace() -> LandmarkSet {
    let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
    points[TIP_IDS[1]] = Landmark::new(0.5, 0.3);
    points[TIP_IDS[2]] = Landmark::new(0.5, 0.3);
    LandmarkSet::new(points)
}

// ---------------------------------------------------------------------------
// Gesture core
// ---------------------------------------------------------------------------

fn bench_fingers_up(c: &mut Criterion) {
    let set = pointing_right();
    c.bench_function("fingers_up", |b| b.iter(|| fingers_up(black_box(&set))));
}

fn bench_classify(c: &mut Criterion) {
    let classifier = GestureClassifier::default();
    let mut group = c.benchmark_group("classify");

    // Index-only decides first; peace is the last rule consulted
    for (name, set) in [("index_right", pointing_right()), ("peace", peace())] {
        let fingers = fingers_up(&set);
        group.bench_with_input(BenchmarkId::from_parameter(name), &set, |b, set| {
            b.iter(|| classifier.classify(black_box(set), black_box(fingers)))
        });
    }
    group.finish();
}

fn bench_pipeline_step(c: &mut Criterion) {
    c.bench_function("pipeline_process", |b| {
        let mut pipeline = GesturePipeline::new(
            GestureClassifier::default(),
            Dispatcher::new(Box::new(LogOnlySink::new())),
        );
        let frame = HandFrame::with_hand(0, peace());
        let mut now = 0u64;

        b.iter(|| {
            now += 1;
            pipeline.process(black_box(&frame), Timestamp::from_millis(now))
        });
    });
}

// ---------------------------------------------------------------------------
// Capture path
// ---------------------------------------------------------------------------

fn bench_parse_frame_line(c: &mut Criterion) {
    let frame = HandFrame::with_hand(42, pointing_right()).at_millis(1400);
    let line = serde_json::to_string(&DetectionMessage::from(&frame)).unwrap();

    c.bench_function("parse_frame_line", |b| {
        b.iter(|| parse_frame_line(black_box(&line), 0).unwrap())
    });
}

fn bench_ring_buffer_pop_latest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_buffer_pop_latest");

    for backlog in [1usize, 4, 15] {
        group.bench_with_input(BenchmarkId::from_parameter(backlog), &backlog, |b, &backlog| {
            let (mut producer, mut consumer) = FrameRingBuffer::with_capacity(16).split();
            let frame = HandFrame::with_hand(0, peace());

            b.iter(|| {
                for _ in 0..backlog {
                    producer.push_frame(frame.clone());
                }
                black_box(consumer.pop_latest())
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_fingers_up,
    bench_classify,
    bench_pipeline_step,
    bench_parse_frame_line,
    bench_ring_buffer_pop_latest,
);
criterion_main!(benches);

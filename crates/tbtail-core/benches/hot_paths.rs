//! Hot-path benchmarks
//!
//! Benchmarks for the work done on every poll and every frame:
//! - CRC-32C over payload-sized buffers
//! - Decoding a file of framed events
//! - Moving-average smoothing
//!
//! Run with: cargo bench -p tbtail-core

use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tbtail_core::analytics::moving_average;
use tbtail_core::checksum::{checksum, checksum_bitwise};
use tbtail_core::{Event, NullSink, RecordReader, RecordWriter};

// ============================================================================
// Checksum Benchmarks
// ============================================================================

fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");

    for size in [64usize, 1024, 64 * 1024] {
        let data = vec![0x5Au8; size];
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("table", size), &data, |b, data| {
            b.iter(|| checksum(black_box(data)))
        });

        // Reference implementation, for comparison only
        group.bench_with_input(BenchmarkId::new("bitwise", size), &data, |b, data| {
            b.iter(|| checksum_bitwise(black_box(data)))
        });
    }

    group.finish();
}

// ============================================================================
// Record Reading Benchmarks
// ============================================================================

fn framed_events(count: i64) -> Vec<u8> {
    let mut writer = RecordWriter::new(Vec::new());
    for step in 0..count {
        let event = Event::new(step, Some(1_700_000_000.0 + step as f64))
            .with_scalar("train/loss", 1.0 / (step as f32 + 1.0))
            .with_scalar("train/epoch", step as f32 / count as f32)
            .with_scalar("lr", 3e-4);
        writer.write_event(&event).expect("write to vec");
    }
    writer.into_inner()
}

fn bench_read_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_records");

    for count in [100i64, 10_000] {
        let bytes = framed_events(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::from_parameter(count), &bytes, |b, bytes| {
            b.iter(|| {
                let mut sink = NullSink;
                let reader = RecordReader::new(Cursor::new(black_box(bytes.as_slice())), 0)
                    .expect("cursor seek");
                reader.records(&mut sink).count()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Smoothing Benchmarks
// ============================================================================

fn bench_moving_average(c: &mut Criterion) {
    let mut group = c.benchmark_group("moving_average");
    let values: Vec<f64> = (0..100_000).map(|i| (i as f64).sin()).collect();

    for window in [10usize, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(window), &window, |b, &window| {
            b.iter(|| moving_average(black_box(&values), window))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_checksum, bench_read_records, bench_moving_average);
criterion_main!(benches);

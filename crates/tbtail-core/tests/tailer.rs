//! Tailer tests for tbtail-core
//!
//! These tests drive the tailer against files that grow, break and recover
//! between scans, the way a live training job's event files do.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tbtail_core::record::encode_frame;
use tbtail_core::{Diagnostic, Event, NullSink, RecordWriter, RunSpec, Severity, Tailer};
use tempfile::TempDir;

fn append(path: &Path, events: &[Event]) {
    let file = OpenOptions::new().create(true).append(true).open(path).unwrap();
    let mut writer = RecordWriter::new(file);
    for event in events {
        writer.write_event(event).unwrap();
    }
    writer.flush().unwrap();
}

fn append_bytes(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
}

fn scalars(step: i64, tags: &[(&str, f32)]) -> Event {
    tags.iter()
        .fold(Event::new(step, Some(step as f64)), |event, (tag, value)| event.with_scalar(*tag, *value))
}

fn run_paths(dir: &TempDir, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|name| dir.path().join(name)).collect()
}

// ============================================================================
// Tag Ordering
// ============================================================================

/// Tags keep first-seen order across runs no matter how often we rescan
#[test]
fn test_tag_order_stable_across_rescans() {
    let dir = TempDir::new().unwrap();
    let paths = run_paths(&dir, &["a", "b"]);
    append(&paths[0], &[scalars(0, &[("loss", 1.0), ("acc", 0.1)])]);
    append(&paths[1], &[scalars(0, &[("lr", 0.1), ("loss", 2.0)])]);

    let mut tailer = Tailer::new([RunSpec::new("a", &paths[0]), RunSpec::new("b", &paths[1])]);
    tailer.rescan(true, &mut NullSink);
    assert_eq!(tailer.tags(), &["loss", "acc", "lr"]);

    for _ in 0..5 {
        tailer.rescan(false, &mut NullSink);
        tailer.rescan(true, &mut NullSink);
        assert_eq!(tailer.tags(), &["loss", "acc", "lr"]);
    }

    append(&paths[1], &[scalars(1, &[("grad_norm", 3.0)])]);
    append(&paths[0], &[scalars(1, &[("val/loss", 0.9)])]);
    let report = tailer.rescan(false, &mut NullSink);

    assert_eq!(report.new_tags, 2);
    assert_eq!(tailer.tags(), &["loss", "acc", "val/loss", "lr", "grad_norm"]);
}

// ============================================================================
// Idempotence
// ============================================================================

/// Replaying the same bytes into a fresh tailer twice gives the same series
#[test]
fn test_replay_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events");
    append(
        &path,
        &[
            scalars(1, &[("loss", 1.0)]),
            scalars(2, &[("loss", 0.8)]),
            scalars(2, &[("loss", 0.7)]),
        ],
    );

    let mut once = Tailer::new([RunSpec::new("a", &path)]);
    once.rescan(true, &mut NullSink);

    // Append the same bytes again: every step is re-emitted
    let bytes = fs::read(&path).unwrap();
    append_bytes(&path, &bytes);
    let mut twice = Tailer::new([RunSpec::new("a", &path)]);
    twice.rescan(true, &mut NullSink);

    assert_eq!(once.runs()[0].series("loss"), twice.runs()[0].series("loss"));
    assert_eq!(once.runs()[0].series("loss").unwrap().get(2).unwrap().value, 0.7);
    assert_eq!(twice.runs()[0].records_read(), 6);
}

// ============================================================================
// Corruption
// ============================================================================

/// A corrupt tail is retried from the same offset and never skipped
#[test]
fn test_corrupt_tail_retried_without_advancing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events");
    append(&path, &[scalars(1, &[("loss", 1.0)]), scalars(2, &[("loss", 0.5)])]);

    let mut tailer = Tailer::new([RunSpec::new("a", &path)]);
    tailer.rescan(true, &mut NullSink);
    let good_offset = tailer.runs()[0].offset();

    let mut bad = encode_frame(&scalars(3, &[("loss", 0.1)]).encode_to_vec());
    let last = bad.len() - 1;
    bad[last] ^= 0xFF;
    append_bytes(&path, &bad);

    for _ in 0..3 {
        let mut sink: Vec<Diagnostic> = Vec::new();
        tailer.rescan(true, &mut sink);

        assert_eq!(tailer.runs()[0].offset(), good_offset);
        assert_eq!(tailer.runs()[0].series("loss").unwrap().len(), 2);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].severity, Severity::Warning);
    }
}

/// Bytes completing a half-written record are picked up on the next scan
#[test]
fn test_partial_record_completed_later() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events");
    append(&path, &[scalars(1, &[("loss", 1.0)])]);

    let frame = encode_frame(&scalars(2, &[("loss", 0.5)]).encode_to_vec());
    let (head, tail) = frame.split_at(10);
    append_bytes(&path, head);

    let mut tailer = Tailer::new([RunSpec::new("a", &path)]);
    let mut sink: Vec<Diagnostic> = Vec::new();
    tailer.rescan(true, &mut sink);
    assert_eq!(tailer.runs()[0].series("loss").unwrap().len(), 1);
    assert_eq!(sink[0].severity, Severity::Info);

    append_bytes(&path, tail);
    let report = tailer.rescan(false, &mut NullSink);

    assert_eq!(report.records, 1);
    assert_eq!(tailer.runs()[0].series("loss").unwrap().len(), 2);
    assert_eq!(tailer.runs()[0].offset(), fs::metadata(&path).unwrap().len());
}

/// A run whose file vanished keeps its data; the others keep updating
#[test]
fn test_vanished_file_keeps_state() {
    let dir = TempDir::new().unwrap();
    let paths = run_paths(&dir, &["a", "b"]);
    append(&paths[0], &[scalars(1, &[("loss", 1.0)])]);
    append(&paths[1], &[scalars(1, &[("loss", 2.0)])]);

    let mut tailer = Tailer::new([RunSpec::new("a", &paths[0]), RunSpec::new("b", &paths[1])]);
    tailer.rescan(true, &mut NullSink);

    fs::remove_file(&paths[0]).unwrap();
    append(&paths[1], &[scalars(2, &[("loss", 1.5)])]);

    let mut sink: Vec<Diagnostic> = Vec::new();
    let report = tailer.rescan(false, &mut sink);

    assert_eq!(report.runs_skipped, 1);
    assert_eq!(report.records, 1);
    assert_eq!(tailer.run("a").unwrap().series("loss").unwrap().len(), 1);
    assert_eq!(tailer.run("b").unwrap().series("loss").unwrap().len(), 2);
    assert!(sink[0].message.starts_with("run a:"));

    // An empty replacement shrinks below the cursor; nothing new to read
    File::create(&paths[0]).unwrap();
    tailer.rescan(false, &mut NullSink);
    assert_eq!(tailer.run("a").unwrap().series("loss").unwrap().len(), 1);
}

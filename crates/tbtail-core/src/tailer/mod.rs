//! Incremental tailer over one or more growing event files
//!
//! Each run keeps a byte cursor pointing just past the last fully consumed
//! record. A scan stats the file, reads from the cursor up to the size seen
//! at stat time and folds scalars into per-tag series. Runs whose size has
//! not changed are skipped, which keeps a fast poll loop cheap.
//!
//! Read failures end the scan of that run only. The cursor never moves past
//! a bad record, so a corrupt tail is retried on every scan and never
//! skipped.

mod run;

pub use run::{Run, RunSpec, Sample, TimeSeries};

use std::collections::HashSet;
use std::fs;

use tracing::{debug, info, instrument};

use crate::diagnostics::DiagnosticSink;
use crate::error::ReadError;
use crate::record::read_from_bounded;

/// Summary of one `rescan` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Runs whose file was read
    pub runs_scanned: usize,
    /// Runs skipped because nothing changed or the file was unavailable
    pub runs_skipped: usize,
    /// Records ingested across all runs
    pub records: u64,
    /// Tags that appeared for the first time
    pub new_tags: usize,
}

/// Owns every run and the union of their tags
#[derive(Debug, Clone, Default)]
pub struct Tailer {
    runs: Vec<Run>,
    /// Union of tags across runs, first-seen order
    tags: Vec<String>,
}

impl Tailer {
    /// Track the given runs; nothing is read until the first `rescan`
    pub fn new(specs: impl IntoIterator<Item = RunSpec>) -> Self {
        Self {
            runs: specs.into_iter().map(Run::new).collect(),
            tags: Vec::new(),
        }
    }

    /// Read newly appended records from every run that changed
    ///
    /// With `force_initial` every run is read regardless of its size.
    #[instrument(skip(self, sink), fields(runs = self.runs.len()))]
    pub fn rescan(&mut self, force_initial: bool, sink: &mut dyn DiagnosticSink) -> ScanReport {
        let mut report = ScanReport::default();

        for run in &mut self.runs {
            let metadata = match fs::metadata(run.path()) {
                Ok(metadata) => metadata,
                Err(e) => {
                    let err = ReadError::io(run.path(), e);
                    sink.report(err.severity(), format!("run {}: {}", run.name(), err));
                    report.runs_skipped += 1;
                    continue;
                }
            };

            let size = metadata.len();
            if !force_initial && run.last_size == Some(size) {
                report.runs_skipped += 1;
                continue;
            }

            if size < run.offset {
                sink.warn(format!(
                    "run {}: file shrank to {} bytes (cursor at {}); re-reading from start",
                    run.name(),
                    size,
                    run.offset
                ));
                run.rewind();
            }

            let start = run.offset;
            let mut ingested = 0u64;
            for (event, end_offset) in read_from_bounded(run.path(), start, Some(size), sink) {
                run.ingest(&event);
                run.offset = end_offset;
                ingested += 1;
            }

            run.last_size = Some(size);
            run.last_modified = metadata.modified().ok();
            report.runs_scanned += 1;
            report.records += ingested;

            debug!(
                run = run.name(),
                from = start,
                to = run.offset,
                size,
                records = ingested,
                "scanned run"
            );
        }

        let before = self.tags.len();
        self.rebuild_tags();
        report.new_tags = self.tags.len().saturating_sub(before);

        if report.records > 0 {
            info!(
                records = report.records,
                scanned = report.runs_scanned,
                tags = self.tags.len(),
                "rescan ingested records"
            );
        }

        report
    }

    /// Whether any run's file size or modification time differs from the
    /// baseline recorded by the last scan
    pub fn needs_rescan(&self) -> bool {
        self.runs.iter().any(|run| match fs::metadata(run.path()) {
            Ok(metadata) => {
                Some(metadata.len()) != run.last_size
                    || metadata.modified().ok() != run.last_modified
            }
            Err(_) => false,
        })
    }

    fn rebuild_tags(&mut self) {
        let mut seen = HashSet::new();
        self.tags.clear();
        for run in &self.runs {
            for tag in run.tags() {
                if seen.insert(tag.as_str()) {
                    self.tags.push(tag.clone());
                }
            }
        }
    }

    /// Runs in configured order
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn run(&self, name: &str) -> Option<&Run> {
        self.runs.iter().find(|run| run.name() == name)
    }

    /// Union of tags across runs in first-seen order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// `(run index, run, series)` for every run holding `tag`, in run order
    pub fn series_for<'a>(
        &'a self,
        tag: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Run, &'a TimeSeries)> + 'a {
        self.runs
            .iter()
            .enumerate()
            .filter_map(move |(index, run)| run.series(tag).map(|series| (index, run, series)))
            .filter(|(_, _, series)| !series.is_empty())
    }

    /// Smallest and largest step of `tag` across all runs
    pub fn step_range(&self, tag: &str) -> Option<(i64, i64)> {
        self.series_for(tag)
            .filter_map(|(_, _, series)| series.step_range())
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)))
    }
}

//! Per-run state: byte cursor, stat baseline and scalar series

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::event::Event;

/// One observed value of a tag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub value: f32,
    /// Wall time of the event that carried the value
    pub wall_time: Option<f64>,
}

/// Step-ordered samples for one (run, tag) pair
///
/// Re-emitted steps overwrite earlier samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    samples: BTreeMap<i64, Sample>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the sample at `step`
    pub fn insert(&mut self, step: i64, sample: Sample) -> Option<Sample> {
        self.samples.insert(step, sample)
    }

    pub fn get(&self, step: i64) -> Option<&Sample> {
        self.samples.get(&step)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in ascending step order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &Sample)> + '_ {
        self.samples.iter().map(|(step, sample)| (*step, sample))
    }

    pub fn steps(&self) -> Vec<i64> {
        self.samples.keys().copied().collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.samples.values().map(|s| s.value as f64).collect()
    }

    pub fn wall_times(&self) -> Vec<Option<f64>> {
        self.samples.values().map(|s| s.wall_time).collect()
    }

    /// Smallest and largest step, if any
    pub fn step_range(&self) -> Option<(i64, i64)> {
        let first = self.samples.keys().next()?;
        let last = self.samples.keys().next_back()?;
        Some((*first, *last))
    }

    pub fn last_step(&self) -> Option<i64> {
        self.samples.keys().next_back().copied()
    }
}

/// Name and file backing a run, as supplied by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub name: String,
    pub path: PathBuf,
}

impl RunSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A named, growing event file and everything read from it so far
#[derive(Debug, Clone)]
pub struct Run {
    name: String,
    path: PathBuf,
    /// End of the last fully consumed record
    pub(crate) offset: u64,
    pub(crate) last_size: Option<u64>,
    pub(crate) last_modified: Option<SystemTime>,
    pub(crate) records_read: u64,
    /// Tags in the order they were first seen
    tag_order: Vec<String>,
    series: HashMap<String, TimeSeries>,
}

impl Run {
    pub fn new(spec: RunSpec) -> Self {
        Self {
            name: spec.name,
            path: spec.path,
            offset: 0,
            last_size: None,
            last_modified: None,
            records_read: 0,
            tag_order: Vec::new(),
            series: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte cursor for the next scan
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// File size recorded at the end of the last scan
    pub fn last_size(&self) -> Option<u64> {
        self.last_size
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_modified
    }

    /// Total records ingested over the run's lifetime
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Tags in first-seen order
    pub fn tags(&self) -> &[String] {
        &self.tag_order
    }

    pub fn series(&self, tag: &str) -> Option<&TimeSeries> {
        self.series.get(tag)
    }

    /// `(tag, series)` pairs in first-seen order
    pub fn all_series(&self) -> impl Iterator<Item = (&str, &TimeSeries)> + '_ {
        self.tag_order
            .iter()
            .filter_map(|tag| self.series.get(tag).map(|series| (tag.as_str(), series)))
    }

    /// Fold one event's scalars into the per-tag series
    pub fn ingest(&mut self, event: &Event) {
        for scalar in &event.scalars {
            if !self.series.contains_key(&scalar.tag) {
                self.tag_order.push(scalar.tag.clone());
            }
            let series = self.series.entry(scalar.tag.clone()).or_default();
            series.insert(
                event.step,
                Sample {
                    value: scalar.value,
                    wall_time: event.wall_time,
                },
            );
        }
        self.records_read += 1;
    }

    /// Forget the cursor so the next scan starts from the beginning
    ///
    /// Series are kept; replaying the same bytes overwrites them in place.
    pub(crate) fn rewind(&mut self) {
        self.offset = 0;
        self.last_size = None;
        self.last_modified = None;
    }
}

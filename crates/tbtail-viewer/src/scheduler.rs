//! Slow-cadence rescan gate
//!
//! The main loop ticks every poll interval; only every `interval` does a
//! tick stat the files, and only stale runs are actually read.

use std::time::{Duration, Instant};

use tbtail_core::{DiagnosticSink, ScanReport, Tailer};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct RescanClock {
    interval: Duration,
    last_check: Option<Instant>,
}

impl RescanClock {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_check: None,
        }
    }

    /// Whether a staleness check is due at `now`
    pub fn due(&self, now: Instant) -> bool {
        match self.last_check {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Record a check at `now`
    pub fn mark(&mut self, now: Instant) {
        self.last_check = Some(now);
    }

    /// Rescan the tailer if a check is due and any file changed
    pub fn tick(
        &mut self,
        now: Instant,
        tailer: &mut Tailer,
        sink: &mut dyn DiagnosticSink,
    ) -> Option<ScanReport> {
        if !self.due(now) {
            return None;
        }
        self.mark(now);

        if !tailer.needs_rescan() {
            debug!("no run changed since last scan");
            return None;
        }
        Some(tailer.rescan(false, sink))
    }
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;

    use tbtail_core::{Event, NullSink, RecordWriter, RunSpec};
    use tempfile::TempDir;

    use super::*;

    fn append(path: &std::path::Path, step: i64) {
        let file = OpenOptions::new().create(true).append(true).open(path).unwrap();
        let mut writer = RecordWriter::new(file);
        writer.write_event(&Event::new(step, Some(step as f64)).with_scalar("loss", 1.0)).unwrap();
    }

    #[test]
    fn test_due_after_interval() {
        let start = Instant::now();
        let mut clock = RescanClock::new(Duration::from_secs(15));
        assert!(clock.due(start));

        clock.mark(start);
        assert!(!clock.due(start + Duration::from_secs(14)));
        assert!(clock.due(start + Duration::from_secs(15)));
    }

    #[test]
    fn test_tick_rescans_only_when_stale() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events");
        append(&path, 1);

        let mut tailer = Tailer::new([RunSpec::new("a", &path)]);
        tailer.rescan(true, &mut NullSink);

        let start = Instant::now();
        let mut clock = RescanClock::new(Duration::from_secs(15));
        clock.mark(start);

        // Unchanged file: check happens, nothing is read
        assert!(clock.tick(start + Duration::from_secs(15), &mut tailer, &mut NullSink).is_none());

        append(&path, 2);
        // Not due yet
        assert!(clock.tick(start + Duration::from_secs(16), &mut tailer, &mut NullSink).is_none());

        let report = clock
            .tick(start + Duration::from_secs(30), &mut tailer, &mut NullSink)
            .unwrap();
        assert_eq!(report.records, 1);
        assert_eq!(tailer.runs()[0].series("loss").unwrap().len(), 2);
    }
}

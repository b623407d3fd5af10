//! Completion estimates from a fractional progress tag

use crate::tailer::{Run, TimeSeries};

/// Tag conventionally logged as the fraction of training completed
pub const DEFAULT_PROGRESS_TAG: &str = "train/epoch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtaKind {
    /// The progress tag reached 1.0; `seconds` is the time it took
    Completed,
    /// Linear extrapolation from the latest positive sample; `seconds` is
    /// the time remaining
    Projected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EtaEstimate {
    pub seconds: f64,
    pub steps_per_second: Option<f64>,
    pub kind: EtaKind,
}

impl EtaEstimate {
    /// `"eta MM:SS, 1.23 steps/s"` style label fragment
    pub fn describe(&self) -> String {
        match self.steps_per_second {
            Some(sps) => format!("eta {}, {}", format_duration(self.seconds), format_throughput(sps)),
            None => format!("eta {}", format_duration(self.seconds)),
        }
    }
}

/// Step deltas go through f64 so distant steps cannot overflow
fn throughput(from: i64, to: i64, seconds: f64) -> Option<f64> {
    let sps = (to as f64 - from as f64) / seconds;
    (seconds > 0.0 && sps.is_finite()).then_some(sps)
}

/// Estimate completion from a progress series rising from 0 toward 1
pub fn estimate_eta(series: &TimeSeries) -> Option<EtaEstimate> {
    let (s0, first) = series.iter().next()?;
    let t0 = first.wall_time?;

    let completed = series
        .iter()
        .find_map(|(step, sample)| match sample.wall_time {
            Some(t) if sample.value >= 1.0 => Some((step, t)),
            _ => None,
        });

    if let Some((step, t1)) = completed {
        let elapsed = t1 - t0;
        if !elapsed.is_finite() {
            return None;
        }
        return Some(EtaEstimate {
            seconds: elapsed.max(0.0),
            steps_per_second: throughput(s0, step, elapsed),
            kind: EtaKind::Completed,
        });
    }

    let (step, fraction, tk) = series
        .iter()
        .filter_map(|(step, sample)| match sample.wall_time {
            Some(t) if sample.value > 0.0 => Some((step, sample.value as f64, t)),
            _ => None,
        })
        .last()?;

    let elapsed = tk - t0;
    let remaining = elapsed / fraction - elapsed;
    if !remaining.is_finite() {
        return None;
    }

    Some(EtaEstimate {
        seconds: remaining.max(0.0),
        steps_per_second: throughput(s0, step, elapsed),
        kind: EtaKind::Projected,
    })
}

/// Estimate for a run, looking up its progress tag
pub fn estimate_run_eta(run: &Run, progress_tag: &str) -> Option<EtaEstimate> {
    run.series(progress_tag).and_then(estimate_eta)
}

/// `MM:SS` below an hour, `H:MM:SS` above
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "?".to_string();
    }
    let total = seconds.max(0.0).round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Precision shrinks as throughput grows
pub fn format_throughput(steps_per_second: f64) -> String {
    if steps_per_second > 10.0 {
        format!("{:.1} steps/s", steps_per_second)
    } else if steps_per_second > 1.0 {
        format!("{:.2} steps/s", steps_per_second)
    } else {
        format!("{:.4} step/s", steps_per_second)
    }
}

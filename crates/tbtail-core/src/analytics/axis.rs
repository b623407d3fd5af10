//! X-axis representations: raw step, time since start, wall-clock time

use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Which quantity the x axis shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XAxisMode {
    #[default]
    Step,
    Relative,
    Absolute,
}

impl XAxisMode {
    /// Cycle step → relative → absolute → step
    pub fn next(self) -> Self {
        match self {
            XAxisMode::Step => XAxisMode::Relative,
            XAxisMode::Relative => XAxisMode::Absolute,
            XAxisMode::Absolute => XAxisMode::Step,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            XAxisMode::Step => "step",
            XAxisMode::Relative => "relative",
            XAxisMode::Absolute => "absolute",
        }
    }
}

impl fmt::Display for XAxisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit chosen for relative time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Minutes,
    Hours,
}

impl TimeUnit {
    /// Smallest unit in which `span_secs` is below 60
    ///
    /// Spans of 60 hours or more still use hours.
    pub fn for_span(span_secs: f64) -> Self {
        if span_secs < 60.0 {
            TimeUnit::Seconds
        } else if span_secs < 3600.0 {
            TimeUnit::Minutes
        } else {
            TimeUnit::Hours
        }
    }

    pub fn seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
        }
    }
}

/// How a projected series' x values should be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisScale {
    Step,
    Relative(TimeUnit),
    Absolute,
}

/// X values for one series plus the axis label describing them
#[derive(Debug, Clone, PartialEq)]
pub struct AxisProjection {
    pub xs: Vec<f64>,
    pub label: String,
    pub scale: AxisScale,
}

impl AxisProjection {
    fn steps(steps: &[i64]) -> Self {
        Self {
            xs: steps.iter().map(|&s| s as f64).collect(),
            label: "step".to_string(),
            scale: AxisScale::Step,
        }
    }
}

/// Project a run's sorted steps onto the x axis
///
/// Time-based modes need a wall time for every sample; if any is missing
/// this series falls back to steps.
pub fn project_x(mode: XAxisMode, steps: &[i64], wall_times: &[Option<f64>]) -> AxisProjection {
    if mode == XAxisMode::Step || steps.is_empty() || wall_times.len() != steps.len() {
        return AxisProjection::steps(steps);
    }

    let Some(times) = wall_times.iter().copied().collect::<Option<Vec<f64>>>() else {
        return AxisProjection::steps(steps);
    };

    match mode {
        XAxisMode::Absolute => AxisProjection {
            label: absolute_label(times[0]),
            xs: times,
            scale: AxisScale::Absolute,
        },
        _ => {
            let t0 = times[0];
            let span = times[times.len() - 1] - t0;
            let unit = TimeUnit::for_span(span);
            AxisProjection {
                xs: times.iter().map(|t| (t - t0) / unit.seconds()).collect(),
                label: format!("time since start ({})", unit.suffix()),
                scale: AxisScale::Relative(unit),
            }
        }
    }
}

fn local_time(epoch_secs: f64) -> Option<DateTime<Local>> {
    if !epoch_secs.is_finite() {
        return None;
    }
    let secs = epoch_secs.floor();
    let nanos = ((epoch_secs - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos).map(|utc| utc.with_timezone(&Local))
}

fn absolute_label(first: f64) -> String {
    match local_time(first) {
        Some(start) => format!("time HH:MM (start {})", start.format("%d/%m")),
        None => "time HH:MM".to_string(),
    }
}

/// Render an x value as a tick label for the given scale
pub fn format_tick(scale: AxisScale, x: f64) -> String {
    match scale {
        AxisScale::Step => format!("{}", x.round() as i64),
        AxisScale::Relative(TimeUnit::Seconds) => format!("{:.0}", x),
        AxisScale::Relative(_) => format!("{:.1}", x),
        AxisScale::Absolute => local_time(x)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "?".to_string()),
    }
}

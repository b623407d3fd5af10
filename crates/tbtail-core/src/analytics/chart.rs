//! Per-frame chart model for the selected tag
//!
//! Everything a renderer needs for one redraw, computed from borrowed tailer
//! state: smoothed points per run, axis label and scale, the title and
//! resolved limits. Building a model has no side effects, so it can be
//! recomputed on every frame.

use super::axis::{AxisScale, XAxisMode, project_x};
use super::eta::{EtaEstimate, estimate_run_eta};
use super::limits::{LimitRejection, SeriesExtent, observed_range, resolve_x_limit, resolve_y_limit};
use super::smoothing::moving_average;
use crate::tailer::Tailer;

/// View settings that shape one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest<'a> {
    /// Index into the tailer's tag list; clamped to the last tag
    pub tag_index: usize,
    pub smoothing: usize,
    pub mode: XAxisMode,
    /// Requested x range in step space
    pub xlim: Option<(i64, i64)>,
    pub ylim: Option<(f64, f64)>,
    pub progress_tag: &'a str,
}

/// One run's line on the chart
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesLine {
    pub run: String,
    /// Run name, plus ETA and throughput when available
    pub label: String,
    /// Position of the run in the tailer; stable across tags
    pub color_index: usize,
    pub steps: Vec<i64>,
    pub points: Vec<(f64, f64)>,
    pub eta: Option<EtaEstimate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub tag: String,
    pub title: String,
    pub x_label: String,
    pub x_scale: AxisScale,
    pub series: Vec<SeriesLine>,
    pub last_step: Option<i64>,
    /// Smallest and largest displayed y value
    pub y_range: Option<(f64, f64)>,
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    pub x_rejection: Option<LimitRejection>,
    pub y_rejection: Option<LimitRejection>,
}

/// Tag at `index`, clamped to the last available tag
pub fn selected_tag(tags: &[String], index: usize) -> Option<&str> {
    let last = tags.len().checked_sub(1)?;
    tags.get(index.min(last)).map(String::as_str)
}

impl ChartModel {
    /// Build the model for the requested tag; `None` while no tags exist
    pub fn build(tailer: &Tailer, request: &ChartRequest<'_>) -> Option<Self> {
        let tag = selected_tag(tailer.tags(), request.tag_index)?;

        let mut series = Vec::new();
        let mut x_label = "step".to_string();
        let mut x_scale = AxisScale::Step;
        let mut xs_per_series = Vec::new();

        for (index, run, data) in tailer.series_for(tag) {
            let steps = data.steps();
            let projection = project_x(request.mode, &steps, &data.wall_times());
            let ys = moving_average(&data.values(), request.smoothing);

            let eta = estimate_run_eta(run, request.progress_tag);
            let label = match &eta {
                Some(estimate) => format!("{} ({})", run.name(), estimate.describe()),
                None => run.name().to_string(),
            };

            x_label = projection.label;
            x_scale = projection.scale;

            series.push(SeriesLine {
                run: run.name().to_string(),
                label,
                color_index: index,
                points: projection.xs.iter().copied().zip(ys.iter().copied()).collect(),
                steps,
                eta,
            });
            xs_per_series.push(projection.xs);
        }

        let last_step = series.iter().filter_map(|s| s.steps.last().copied()).max();
        let ys_per_series: Vec<Vec<f64>> = series
            .iter()
            .map(|s| s.points.iter().map(|&(_, y)| y).collect())
            .collect();
        let y_range = observed_range(ys_per_series.iter().map(Vec::as_slice));

        let (x_limits, x_rejection) = match request.xlim {
            Some(xlim) => {
                let extents: Vec<SeriesExtent<'_>> = series
                    .iter()
                    .zip(&xs_per_series)
                    .map(|(line, xs)| SeriesExtent { steps: &line.steps, xs })
                    .collect();
                split(resolve_x_limit(xlim, request.mode, &extents))
            }
            None => (None, None),
        };

        let (y_limits, y_rejection) = match request.ylim {
            Some(ylim) => split(resolve_y_limit(ylim, y_range)),
            None => (None, None),
        };

        let title = match last_step {
            Some(step) => format!("{} (smooth={}, last_step={})", tag, request.smoothing, step),
            None => format!("{} (smooth={})", tag, request.smoothing),
        };

        Some(Self {
            tag: tag.to_string(),
            title,
            x_label,
            x_scale,
            series,
            last_step,
            y_range,
            x_limits,
            y_limits,
            x_rejection,
            y_rejection,
        })
    }

    /// Axis bounds to draw: resolved limits, else the data extent
    ///
    /// Degenerate extents are widened so a single point stays visible.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        let x_extent = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|&(x, _)| x))
            .filter(|x| x.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                Some((min, max)) => Some((min.min(x), max.max(x))),
                None => Some((x, x)),
            });

        let x = self.x_limits.or(x_extent).unwrap_or((0.0, 1.0));
        let y = self.y_limits.or(self.y_range).unwrap_or((0.0, 1.0));
        (widen(x), widen(y))
    }
}

fn split(result: Result<(f64, f64), LimitRejection>) -> (Option<(f64, f64)>, Option<LimitRejection>) {
    match result {
        Ok(bounds) => (Some(bounds), None),
        Err(rejection) => (None, Some(rejection)),
    }
}

fn widen((lo, hi): (f64, f64)) -> [f64; 2] {
    if hi > lo {
        [lo, hi]
    } else {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.05 };
        [lo - pad, hi + pad]
    }
}

#[cfg(test)]
mod tests {
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::path::Path;

    use tempfile::TempDir;

    use super::*;
    use crate::diagnostics::NullSink;
    use crate::event::Event;
    use crate::record::encode_frame;
    use crate::tailer::RunSpec;

    fn append(path: &Path, events: &[Event]) {
        let mut file = OpenOptions::new().create(true).append(true).open(path).unwrap();
        for event in events {
            file.write_all(&encode_frame(&event.encode_to_vec())).unwrap();
        }
    }

    fn request() -> ChartRequest<'static> {
        ChartRequest {
            tag_index: 0,
            smoothing: 0,
            mode: XAxisMode::Step,
            xlim: None,
            ylim: None,
            progress_tag: "train/epoch",
        }
    }

    fn two_runs(dir: &TempDir) -> Tailer {
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        append(
            &a,
            &[
                Event::new(0, Some(100.0)).with_scalar("loss", 1.0).with_scalar("train/epoch", 0.0),
                Event::new(10, Some(110.0)).with_scalar("loss", 0.5).with_scalar("train/epoch", 0.5),
                Event::new(20, Some(120.0)).with_scalar("loss", 0.25).with_scalar("train/epoch", 1.0),
            ],
        );
        append(&b, &[Event::new(5, None).with_scalar("acc", 0.1).with_scalar("loss", 2.0)]);

        let mut tailer = Tailer::new([RunSpec::new("a", &a), RunSpec::new("b", &b)]);
        tailer.rescan(true, &mut NullSink);
        tailer
    }

    #[test]
    fn test_empty_tailer_has_no_model() {
        let tailer = Tailer::new(Vec::new());
        assert!(ChartModel::build(&tailer, &request()).is_none());
    }

    #[test]
    fn test_selected_tag_clamps() {
        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(selected_tag(&tags, 0), Some("a"));
        assert_eq!(selected_tag(&tags, 9), Some("b"));
        assert_eq!(selected_tag(&[], 0), None);
    }

    #[test]
    fn test_model_for_shared_tag() {
        let dir = TempDir::new().unwrap();
        let tailer = two_runs(&dir);
        let model = ChartModel::build(&tailer, &request()).unwrap();

        assert_eq!(model.tag, "loss");
        assert_eq!(model.title, "loss (smooth=0, last_step=20)");
        assert_eq!(model.series.len(), 2);
        assert_eq!(model.series[0].points, vec![(0.0, 1.0), (10.0, 0.5), (20.0, 0.25)]);
        assert_eq!(model.series[0].label, "a (eta 00:20, 1.0000 step/s)");
        assert_eq!(model.series[1].label, "b");
        assert_eq!(model.series[1].color_index, 1);
        assert_eq!(model.y_range, Some((0.25, 2.0)));
    }

    #[test]
    fn test_color_index_follows_run_position() {
        let dir = TempDir::new().unwrap();
        let tailer = two_runs(&dir);
        let acc = tailer.tags().iter().position(|t| t == "acc").unwrap();
        let model = ChartModel::build(&tailer, &ChartRequest { tag_index: acc, ..request() }).unwrap();

        assert_eq!(model.series.len(), 1);
        assert_eq!(model.series[0].color_index, 1);
    }

    #[test]
    fn test_smoothing_applied() {
        let dir = TempDir::new().unwrap();
        let tailer = two_runs(&dir);
        let model = ChartModel::build(&tailer, &ChartRequest { smoothing: 2, ..request() }).unwrap();

        let ys: Vec<f64> = model.series[0].points.iter().map(|&(_, y)| y).collect();
        assert_eq!(ys, vec![1.0, 0.75, 0.375]);
        assert_eq!(model.title, "loss (smooth=2, last_step=20)");
    }

    #[test]
    fn test_limits_resolved_and_rejected() {
        let dir = TempDir::new().unwrap();
        let tailer = two_runs(&dir);

        let ok = ChartModel::build(
            &tailer,
            &ChartRequest { xlim: Some((5, 15)), ylim: Some((0.0, 0.9)), ..request() },
        )
        .unwrap();
        assert_eq!(ok.x_limits, Some((5.0, 15.0)));
        assert_eq!(ok.y_limits, Some((0.25, 0.9)));

        let rejected =
            ChartModel::build(&tailer, &ChartRequest { xlim: Some((100, 200)), ..request() }).unwrap();
        assert_eq!(rejected.x_limits, None);
        assert_eq!(rejected.x_rejection, Some(LimitRejection::OutsideRange));
    }

    #[test]
    fn test_relative_mode_with_mixed_wall_times() {
        let dir = TempDir::new().unwrap();
        let tailer = two_runs(&dir);
        let model =
            ChartModel::build(&tailer, &ChartRequest { mode: XAxisMode::Relative, ..request() }).unwrap();

        assert_eq!(model.series[0].points[2], (20.0, 0.25));
        // run b has no wall times and falls back to steps
        assert_eq!(model.series[1].points, vec![(5.0, 2.0)]);
    }

    #[test]
    fn test_bounds_widen_single_point() {
        let dir = TempDir::new().unwrap();
        let tailer = two_runs(&dir);
        let acc = tailer.tags().iter().position(|t| t == "acc").unwrap();
        let model = ChartModel::build(&tailer, &ChartRequest { tag_index: acc, ..request() }).unwrap();

        let (x, y) = model.bounds();
        assert!(x[0] < 5.0 && x[1] > 5.0);
        assert!(y[0] < 0.1 && y[1] > 0.1);
    }
}

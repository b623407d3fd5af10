//! Pure computations over tailed series
//!
//! Nothing here touches the filesystem or the terminal. The viewer calls
//! [`ChartModel::build`] once per frame and hands the result to its
//! renderer.

pub mod axis;
pub mod chart;
pub mod eta;
pub mod limits;
pub mod smoothing;

pub use axis::{AxisProjection, AxisScale, TimeUnit, XAxisMode, format_tick, project_x};
pub use chart::{ChartModel, ChartRequest, SeriesLine, selected_tag};
pub use eta::{
    DEFAULT_PROGRESS_TAG, EtaEstimate, EtaKind, estimate_eta, estimate_run_eta, format_duration,
    format_throughput,
};
pub use limits::{
    LimitRejection, SeriesExtent, clamp_step_limit, observed_range, resolve_x_limit,
    resolve_y_limit,
};
pub use smoothing::moving_average;

//! Axis-limit resolution
//!
//! X-limits are requested in step space. In step mode they are clamped to
//! the observed step range; in time modes they select the points whose step
//! falls inside the request and the limit becomes the span of those points'
//! x values. Y-limits clamp to the observed value range.

use thiserror::Error;

use super::axis::XAxisMode;

/// Why a requested limit could not be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimitRejection {
    #[error("no data to apply the limit to")]
    NoData,

    #[error("requested limit is outside the data range")]
    OutsideRange,

    #[error("requested limit selects no points")]
    NoPointsInRange,

    #[error("resolved limit has non-positive width")]
    NonPositiveWidth,
}

impl LimitRejection {
    /// Whether the stored request should be dropped
    ///
    /// A zero-width projection can widen once more points arrive, so the
    /// request is kept and only skipped for the current frame.
    pub fn clears_request(&self) -> bool {
        !matches!(self, LimitRejection::NonPositiveWidth)
    }
}

/// Steps and projected x values of one displayed series
#[derive(Debug, Clone, Copy)]
pub struct SeriesExtent<'a> {
    pub steps: &'a [i64],
    pub xs: &'a [f64],
}

/// Order a pair so the smaller bound comes first
fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if b < a { (b, a) } else { (a, b) }
}

/// Clamp a step-space request to the observed step range
pub fn clamp_step_limit(
    request: (i64, i64),
    observed: Option<(i64, i64)>,
) -> Result<(i64, i64), LimitRejection> {
    let (lo, hi) = ordered(request.0, request.1);
    let (min_step, max_step) = observed.ok_or(LimitRejection::NoData)?;

    let lo = lo.max(min_step);
    let hi = hi.min(max_step);
    if hi <= lo {
        return Err(LimitRejection::OutsideRange);
    }
    Ok((lo, hi))
}

/// Resolve a step-space x request into bounds in the active axis space
pub fn resolve_x_limit(
    request: (i64, i64),
    mode: XAxisMode,
    series: &[SeriesExtent<'_>],
) -> Result<(f64, f64), LimitRejection> {
    if mode == XAxisMode::Step {
        let observed = series
            .iter()
            .filter_map(|s| Some((*s.steps.first()?, *s.steps.last()?)))
            .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)));
        let (lo, hi) = clamp_step_limit(request, observed)?;
        return Ok((lo as f64, hi as f64));
    }

    if series.iter().all(|s| s.steps.is_empty()) {
        return Err(LimitRejection::NoData);
    }

    let (lo, hi) = ordered(request.0, request.1);
    let bounds = series
        .iter()
        .flat_map(|s| s.steps.iter().zip(s.xs.iter()))
        .filter(|&(&step, _)| lo <= step && step <= hi)
        .map(|(_, &x)| x)
        .fold(None, |acc: Option<(f64, f64)>, x| match acc {
            Some((min, max)) => Some((min.min(x), max.max(x))),
            None => Some((x, x)),
        });

    let (min, max) = bounds.ok_or(LimitRejection::NoPointsInRange)?;
    if max <= min {
        return Err(LimitRejection::NonPositiveWidth);
    }
    Ok((min, max))
}

/// Smallest and largest finite value across the given series
pub fn observed_range<'a>(values: impl IntoIterator<Item = &'a [f64]>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .flat_map(|v| v.iter().copied())
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
            None => Some((v, v)),
        })
}

/// Clamp a y request to the observed value range
pub fn resolve_y_limit(
    request: (f64, f64),
    observed: Option<(f64, f64)>,
) -> Result<(f64, f64), LimitRejection> {
    let (lo, hi) = ordered(request.0, request.1);
    let (min, max) = observed.ok_or(LimitRejection::NoData)?;

    let lo = lo.max(min);
    let hi = hi.min(max);
    if hi <= lo {
        return Err(LimitRejection::OutsideRange);
    }
    Ok((lo, hi))
}

//! Range queries over parsed logs.

use pv_core::Real;
use pv_core::timing::{Timer, log_timing};
use pv_log::{ParseResult, Sample, TimeSeries};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Default bound on `points * series` for residual plots.
pub const MAX_PLOT_POINTS: usize = 15_000;

/// Inclusive time window requested by a plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Real,
    pub end: Real,
}

fn parse_bound(input: &str, what: &'static str) -> AppResult<Real> {
    let invalid = || AppError::InvalidRange {
        what,
        input: input.to_string(),
    };
    let value = pv_core::parse_real(input, what).map_err(|_| invalid())?;
    if value.is_nan() {
        return Err(invalid());
    }
    Ok(value)
}

impl TimeWindow {
    pub fn new(start: Real, end: Real) -> Self {
        Self { start, end }
    }

    /// Parse request bounds. Either side failing to parse is an `InvalidRange`.
    pub fn parse(start: &str, end: &str) -> AppResult<Self> {
        Ok(Self {
            start: parse_bound(start, "start time")?,
            end: parse_bound(end, "end time")?,
        })
    }

    pub fn contains(&self, t: Real) -> bool {
        self.start <= t && t <= self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

/// One residual line on the plot: `{"key": .., "values": [{"x", "y"}, ..]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidualSeries {
    pub key: String,
    pub values: Vec<Point>,
}

/// Residual series in name order, filtered to `window` and decimated so that
/// `total points * series count` stays within `max_points`.
pub fn residual_series(
    result: &ParseResult,
    window: TimeWindow,
    max_points: usize,
) -> Vec<ResidualSeries> {
    let timer = Timer::start();
    let mut out: Vec<ResidualSeries> = result
        .residuals
        .values()
        .map(|series| ResidualSeries {
            key: series.name.clone(),
            values: series
                .data
                .iter()
                .filter(|(t, _)| window.contains(*t))
                .map(|&(x, y)| Point { x, y })
                .collect(),
        })
        .collect();
    decimate(&mut out, max_points);
    timer.stop_into(&log_timing::QUERY);
    out
}

/// Halve every series (keep indices 0, 2, 4, ..) until the payload bound holds
/// or no series has more than one point left.
pub fn decimate(series: &mut [ResidualSeries], max_points: usize) {
    let count = series.len();
    loop {
        let total: usize = series.iter().map(|s| s.values.len()).sum();
        if total.saturating_mul(count) <= max_points {
            return;
        }
        if series.iter().all(|s| s.values.len() <= 1) {
            return;
        }
        for s in series.iter_mut() {
            s.values = s.values.iter().step_by(2).copied().collect();
        }
    }
}

/// Force series in name order with out-of-window points trimmed from each end.
///
/// Only the ends are trimmed: points inside the data that fall outside the
/// window are kept if they are not at either end. The parsed result is not
/// modified.
pub fn force_series(result: &ParseResult, window: TimeWindow) -> Vec<TimeSeries> {
    let timer = Timer::start();
    let out = result
        .forces
        .values()
        .map(|series| TimeSeries {
            name: series.name.clone(),
            data: trim_ends(&series.data, window),
        })
        .collect();
    timer.stop_into(&log_timing::QUERY);
    out
}

fn trim_ends(data: &[Sample], window: TimeWindow) -> Vec<Sample> {
    let lead = data.iter().take_while(|s| s.0 < window.start).count();
    let rest = &data[lead..];
    let trail = rest.iter().rev().take_while(|s| s.0 > window.end).count();
    rest[..rest.len() - trail].to_vec()
}

fn representative(result: &ParseResult) -> AppResult<&TimeSeries> {
    result
        .residuals
        .values()
        .next()
        .ok_or_else(|| AppError::NoData("log has no residual series".to_string()))
}

/// Time of the first sample of the first residual series (by name).
pub fn min_time(result: &ParseResult) -> AppResult<Real> {
    let series = representative(result)?;
    series
        .first_time()
        .ok_or_else(|| AppError::NoData(format!("residual series '{}' is empty", series.name)))
}

/// Time of the last sample of the first residual series (by name).
pub fn max_time(result: &ParseResult) -> AppResult<Real> {
    let series = representative(result)?;
    series
        .last_time()
        .ok_or_else(|| AppError::NoData(format!("residual series '{}' is empty", series.name)))
}

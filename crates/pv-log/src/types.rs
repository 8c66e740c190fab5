//! Parsed series types.

use std::collections::BTreeMap;

use pv_core::Real;
use serde::Serialize;

/// One `(time, value)` sample.
pub type Sample = (Real, Real);

/// Named time series. Serialises as `{"name": .., "data": [[t, v], ..]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub name: String,
    pub data: Vec<Sample>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Time of the first sample.
    pub fn first_time(&self) -> Option<Real> {
        self.data.first().map(|s| s.0)
    }

    /// Time of the last sample.
    pub fn last_time(&self) -> Option<Real> {
        self.data.last().map(|s| s.0)
    }

    pub fn is_time_sorted(&self) -> bool {
        self.data.windows(2).all(|w| w[0].0 <= w[1].0)
    }
}

/// Everything extracted from one log, keyed and ordered by series name.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParseResult {
    pub residuals: BTreeMap<String, TimeSeries>,
    pub forces: BTreeMap<String, TimeSeries>,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.residuals.is_empty() && self.forces.is_empty()
    }

    pub fn force(&self, name: &str) -> Option<&TimeSeries> {
        self.forces.get(name)
    }
}

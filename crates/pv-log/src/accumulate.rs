//! Single-pass state machine turning classified lines into series.

use std::collections::BTreeMap;

use pv_core::Real;

use crate::classify::{LineKind, classify_line};
use crate::types::{ParseResult, TimeSeries};
use crate::{LogError, LogResult};

/// Accumulates residual and force series in line order.
///
/// Every record is stamped with the most recent `Time = ` value (0.0 before
/// the first one). Call [`SeriesAccumulator::finish`] once the log is consumed.
#[derive(Debug, Default)]
pub struct SeriesAccumulator {
    time: Real,
    inside_force_block: bool,
    line_no: usize,
    residuals: BTreeMap<String, TimeSeries>,
    forces: BTreeMap<String, TimeSeries>,
}

fn append(map: &mut BTreeMap<String, TimeSeries>, name: String, sample: (Real, Real)) {
    map.entry(name)
        .or_insert_with_key(|k| TimeSeries::new(k.clone()))
        .data
        .push(sample);
}

impl SeriesAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inside_force_block(&self) -> bool {
        self.inside_force_block
    }

    /// Classify and apply the next line.
    pub fn push_line(&mut self, line: &str) -> LogResult<()> {
        self.line_no += 1;
        let kind = classify_line(line, self.inside_force_block).map_err(|reason| {
            LogError::MalformedLine {
                line_no: self.line_no,
                line: line.to_string(),
                reason,
            }
        })?;
        self.apply(kind);
        Ok(())
    }

    pub fn apply(&mut self, kind: LineKind) {
        match kind {
            LineKind::TimeMarker(t) => {
                self.time = t;
                self.inside_force_block = false;
            }
            LineKind::ResidualRecord { field, value } => {
                append(&mut self.residuals, field, (self.time, value));
                // Unindented, so it also terminates any open coefficient block.
                self.inside_force_block = false;
            }
            LineKind::ForceBlockStart => self.inside_force_block = true,
            LineKind::ForceCoefficientRecord { name, value } => {
                append(&mut self.forces, name, (self.time, value));
            }
            LineKind::BlockEnd => self.inside_force_block = false,
            LineKind::Unclassified => {}
        }
    }

    /// Sort residual series by time and hand back the result.
    ///
    /// The sort is stable, so samples sharing a time keep their log order.
    /// Force series are left as recorded.
    pub fn finish(mut self) -> ParseResult {
        for series in self.residuals.values_mut() {
            series.data.sort_by(|a, b| a.0.total_cmp(&b.0));
        }
        ParseResult {
            residuals: self.residuals,
            forces: self.forces,
        }
    }
}

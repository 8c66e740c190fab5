//! pv-log: FOAM solver log parsing.
//!
//! A single pass over the log lines classifies each one ([`classify`]) and
//! feeds a small state machine ([`accumulate`]) that builds residual and
//! force-coefficient time series keyed by name.

pub mod accumulate;
pub mod classify;
pub mod reader;
pub mod types;

use std::path::PathBuf;

use pv_core::timing::{self, Timer};

pub use accumulate::SeriesAccumulator;
pub use classify::{LineFault, LineKind, classify_line};
pub use reader::{FsLogReader, LogPath, LogReader};
pub use types::*;

pub type LogResult<T> = Result<T, LogError>;

#[derive(thiserror::Error, Debug)]
pub enum LogError {
    #[error("Log file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read log file: {}", path.display())]
    Access {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed line {line_no}: {reason} ('{line}')")]
    MalformedLine {
        line_no: usize,
        line: String,
        reason: LineFault,
    },
}

/// Parse an in-memory sequence of log lines.
///
/// Fails on the first malformed line; no partial result is returned.
pub fn parse_lines<I, S>(lines: I) -> LogResult<ParseResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut acc = SeriesAccumulator::new();
    for line in lines {
        acc.push_line(line.as_ref())?;
    }
    Ok(acc.finish())
}

/// Parse log text held in memory.
pub fn parse_str(text: &str) -> LogResult<ParseResult> {
    parse_lines(text.lines())
}

/// Read and parse the log at `path` through `reader`.
pub fn parse_log(reader: &dyn LogReader, path: &LogPath) -> LogResult<ParseResult> {
    let timer = Timer::start();
    let lines = reader.read_lines(path)?;
    let line_count = lines.len();
    let result = parse_lines(lines)?;
    timer.stop_into(&timing::log_timing::PARSE);

    tracing::debug!(
        path = %path,
        lines = line_count,
        residuals = result.residuals.len(),
        forces = result.forces.len(),
        "parsed solver log"
    );
    Ok(result)
}

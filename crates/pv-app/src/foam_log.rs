//! Log-backed data source shared by the residual and force plots.

use std::cell::OnceCell;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pv_core::Real;
use pv_log::{LogPath, LogReader, ParseResult};
use pv_project::{CaseId, FeatureId, OptionLookup, OptionScope};

use crate::cache::ResultCache;
use crate::error::AppResult;
use crate::query;

/// Log file name used when a feature has no `logFile` option.
pub const DEFAULT_LOG_FILE: &str = "log.pisoFoam";

/// Work out where a feature's log lives: the media root, the case's `caseDir`
/// option and the feature's `logFile` option (or [`DEFAULT_LOG_FILE`]).
pub fn resolve_log_path(
    options: &dyn OptionLookup,
    media_root: &Path,
    case_id: CaseId,
    feature_id: FeatureId,
) -> AppResult<LogPath> {
    let log_file = options
        .get_option(OptionScope::Feature(case_id, feature_id), "logFile")
        .unwrap_or(DEFAULT_LOG_FILE);
    let case_dir = options.require_option(OptionScope::Case(case_id), "caseDir")?;
    let path = LogPath::resolve(media_root, case_dir, log_file);
    tracing::debug!(case_id, feature_id, path = %path, "resolved log file path");
    Ok(path)
}

/// A solver log plus the cache it is read through.
///
/// The first successful parse is memoised, so repeated calls on the same
/// value never consult the cache or the reader again.
pub struct FoamLog {
    path: LogPath,
    reader: Arc<dyn LogReader>,
    cache: Arc<ResultCache>,
    parsed: OnceCell<Arc<ParseResult>>,
}

impl FoamLog {
    pub fn new(path: LogPath, reader: Arc<dyn LogReader>, cache: Arc<ResultCache>) -> Self {
        Self {
            path,
            reader,
            cache,
            parsed: OnceCell::new(),
        }
    }

    /// Modification time of the log file. Does not parse.
    pub fn last_update_time(&self) -> AppResult<DateTime<Utc>> {
        let time = self.reader.last_modified(&self.path)?;
        tracing::debug!(path = %self.path, %time, "log last update time");
        Ok(time)
    }

    pub fn process_log(&self) -> AppResult<Arc<ParseResult>> {
        if let Some(parsed) = self.parsed.get() {
            return Ok(parsed.clone());
        }
        let parsed = self.cache.get_or_parse(self.reader.as_ref(), &self.path)?;
        Ok(self.parsed.get_or_init(|| parsed).clone())
    }

    pub fn min_time(&self) -> AppResult<Real> {
        let parsed = self.process_log()?;
        query::min_time(&parsed)
    }

    pub fn max_time(&self) -> AppResult<Real> {
        let parsed = self.process_log()?;
        query::max_time(&parsed)
    }
}

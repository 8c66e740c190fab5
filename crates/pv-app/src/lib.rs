//! Service layer for percyval.
//!
//! Resolves case features to their handlers, reads solver logs through the
//! shared parse cache and answers the plot queries (data, update time, time
//! range) that the CLI and any other frontend expose.

pub mod cache;
pub mod case_service;
pub mod error;
pub mod feature;
pub mod foam_log;
pub mod query;

pub use cache::{Clock, ResultCache, SystemClock, cache_key};
pub use case_service::{
    CaseFeature, CaseSummary, FeatureSummary, TimeRange, UpdateTime, Workspace,
    format_update_time,
};
pub use error::{AppError, AppResult};
pub use feature::{Feature, Plot, PlotData, build_handler};
pub use foam_log::{DEFAULT_LOG_FILE, FoamLog, resolve_log_path};
pub use query::{
    MAX_PLOT_POINTS, Point, ResidualSeries, TimeWindow, force_series, residual_series,
};

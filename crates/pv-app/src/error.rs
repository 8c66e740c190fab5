//! Error types for the pv-app service layer.

use pv_project::{CaseId, FeatureId, FeatureKind, OptionScope};

/// Application error type covering log access, parsing, configuration and
/// request validation.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Log(#[from] pv_log::LogError),

    #[error("Invalid {what}: '{input}' is not a number")]
    InvalidRange { what: &'static str, input: String },

    #[error("Missing option '{name}' for {scope}")]
    MissingOption { scope: OptionScope, name: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Catalog error: {0}")]
    Project(String),

    #[error("Case not found: {0}")]
    CaseNotFound(CaseId),

    #[error("Feature {feature_id} not found in case {case_id}")]
    FeatureNotFound {
        case_id: CaseId,
        feature_id: FeatureId,
    },

    #[error("Feature kind {kind} does not provide plots")]
    NotAPlot { kind: FeatureKind },

    #[error("Unsupported: {what}")]
    Unsupported { what: String },

    #[error("No data: {0}")]
    NoData(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for pv-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<pv_project::ProjectError> for AppError {
    fn from(err: pv_project::ProjectError) -> Self {
        match err {
            pv_project::ProjectError::MissingOption { scope, name } => {
                AppError::MissingOption { scope, name }
            }
            other => AppError::Project(other.to_string()),
        }
    }
}

//! pv-project: case catalog format, validation and option lookup.

pub mod lookup;
pub mod schema;
pub mod validate;

pub use lookup::{OptionLookup, OptionScope};
pub use schema::*;
pub use validate::{ValidationError, validate_catalog};

/// Latest catalog format understood by this build.
pub const LATEST_VERSION: u32 = 1;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Missing option '{name}' for {scope}")]
    MissingOption { scope: OptionScope, name: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Catalog> {
    let content = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_yaml::from_str(&content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

pub fn save_yaml(path: &std::path::Path, catalog: &Catalog) -> ProjectResult<()> {
    validate_catalog(catalog)?;
    let content = serde_yaml::to_string(catalog)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Catalog> {
    let content = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

/// Load a catalog, picking the format from the file extension (`.json`, else YAML).
pub fn load_catalog(path: &std::path::Path) -> ProjectResult<Catalog> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

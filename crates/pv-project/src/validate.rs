//! Catalog validation logic.

use std::collections::HashSet;

use crate::schema::{CaseDef, Catalog, OptionDef};

/// Longest case, option or owner name accepted.
pub const MAX_NAME_LEN: usize = 128;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: u32, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn check_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("longer than {} characters", MAX_NAME_LEN),
        });
    }
    Ok(())
}

fn validate_options(options: &[OptionDef], context: &str) -> Result<(), ValidationError> {
    for option in options {
        check_name(&format!("{} option name", context), &option.name)?;
    }
    Ok(())
}

pub fn validate_catalog(catalog: &Catalog) -> Result<(), ValidationError> {
    if catalog.version == 0 || catalog.version > crate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: catalog.version,
        });
    }

    let settings = &catalog.settings;
    if settings.max_plot_points == 0 {
        return Err(ValidationError::InvalidValue {
            field: "settings.max_plot_points".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }
    if settings.cache_capacity == 0 {
        return Err(ValidationError::InvalidValue {
            field: "settings.cache_capacity".to_string(),
            value: "0".to_string(),
            reason: "must be positive".to_string(),
        });
    }

    let mut case_ids = HashSet::new();
    for case in &catalog.cases {
        if !case_ids.insert(case.id) {
            return Err(ValidationError::DuplicateId {
                id: case.id,
                context: "cases".to_string(),
            });
        }
        validate_case(case)?;
    }

    Ok(())
}

fn validate_case(case: &CaseDef) -> Result<(), ValidationError> {
    check_name("case name", &case.name)?;
    check_name("case owner", &case.owner)?;
    validate_options(&case.options, "case")?;

    let mut feature_ids = HashSet::new();
    for feature in &case.features {
        if !feature_ids.insert(feature.id) {
            return Err(ValidationError::DuplicateId {
                id: feature.id,
                context: format!("features of case {}", case.id),
            });
        }
        validate_options(&feature.options, "feature")?;
    }
    Ok(())
}

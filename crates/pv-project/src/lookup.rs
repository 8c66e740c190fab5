//! Scoped key/value option lookup.

use std::fmt;

use crate::schema::{CaseId, Catalog, FeatureId, OptionDef};

/// Where an option is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionScope {
    Case(CaseId),
    Feature(CaseId, FeatureId),
}

impl fmt::Display for OptionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionScope::Case(case) => write!(f, "case {}", case),
            OptionScope::Feature(case, feature) => {
                write!(f, "feature {} of case {}", feature, case)
            }
        }
    }
}

/// Read access to case- and feature-scoped options.
pub trait OptionLookup {
    /// First option called `name` in `scope`, if any.
    fn get_option(&self, scope: OptionScope, name: &str) -> Option<&str>;

    /// Like [`OptionLookup::get_option`] but missing options are an error.
    fn require_option(&self, scope: OptionScope, name: &str) -> crate::ProjectResult<&str> {
        self.get_option(scope, name)
            .ok_or_else(|| crate::ProjectError::MissingOption {
                scope,
                name: name.to_string(),
            })
    }
}

fn first<'a>(options: &'a [OptionDef], name: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|o| o.name == name)
        .map(|o| o.value.as_str())
}

impl OptionLookup for Catalog {
    fn get_option(&self, scope: OptionScope, name: &str) -> Option<&str> {
        match scope {
            OptionScope::Case(case_id) => first(&self.case(case_id)?.options, name),
            OptionScope::Feature(case_id, feature_id) => {
                first(&self.case(case_id)?.feature(feature_id)?.options, name)
            }
        }
    }
}

//! Catalog schema definitions.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub type CaseId = u32;
pub type FeatureId = u32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub version: u32,
    pub name: String,
    /// Root that every case's `caseDir` option is resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_root: Option<PathBuf>,
    #[serde(default)]
    pub settings: PlotSettings,
    #[serde(default)]
    pub cases: Vec<CaseDef>,
}

impl Catalog {
    pub fn case(&self, id: CaseId) -> Option<&CaseDef> {
        self.cases.iter().find(|c| c.id == id)
    }
}

/// Tunables for the log engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlotSettings {
    /// Seconds a parsed log stays cached.
    pub cache_ttl_s: u64,
    /// Upper bound on `points * series` for residual plots.
    pub max_plot_points: usize,
    /// Maximum number of cached logs.
    pub cache_capacity: usize,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            cache_ttl_s: 120,
            max_plot_points: 15_000,
            cache_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaseDef {
    pub id: CaseId,
    pub name: String,
    pub owner: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<OptionDef>,
    #[serde(default)]
    pub features: Vec<FeatureDef>,
}

impl CaseDef {
    pub fn feature(&self, id: FeatureId) -> Option<&FeatureDef> {
        self.features.iter().find(|f| f.id == id)
    }
}

/// Name/value pair. Names may repeat; lookups take the first match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionDef {
    pub name: String,
    pub value: String,
}

impl OptionDef {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureDef {
    pub id: FeatureId,
    pub kind: FeatureKind,
    #[serde(default)]
    pub options: Vec<OptionDef>,
}

/// Closed set of feature kinds a case can carry.
///
/// Serialised with the legacy type names; anything else fails to load.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    #[serde(rename = "FOAMResiduals")]
    FoamResiduals,
    #[serde(rename = "FOAMForces")]
    FoamForces,
    ImageGallery,
    MovieGallery,
    #[serde(rename = "WebGLScenes")]
    WebGlScenes,
    JobMonitor,
}

impl FeatureKind {
    pub const ALL: [FeatureKind; 6] = [
        FeatureKind::FoamResiduals,
        FeatureKind::FoamForces,
        FeatureKind::ImageGallery,
        FeatureKind::MovieGallery,
        FeatureKind::WebGlScenes,
        FeatureKind::JobMonitor,
    ];

    /// Name shown wherever the feature is referenced in the UI.
    pub fn friendly_name(self) -> &'static str {
        match self {
            FeatureKind::FoamResiduals => "Residuals",
            FeatureKind::FoamForces => "Forces",
            FeatureKind::ImageGallery => "Images",
            FeatureKind::MovieGallery => "Movies",
            FeatureKind::WebGlScenes => "3D Scenes",
            FeatureKind::JobMonitor => "Job Monitor",
        }
    }

    pub fn is_plot(self) -> bool {
        matches!(self, FeatureKind::FoamResiduals | FeatureKind::FoamForces)
    }

    pub fn type_name(self) -> &'static str {
        match self {
            FeatureKind::FoamResiduals => "FOAMResiduals",
            FeatureKind::FoamForces => "FOAMForces",
            FeatureKind::ImageGallery => "ImageGallery",
            FeatureKind::MovieGallery => "MovieGallery",
            FeatureKind::WebGlScenes => "WebGLScenes",
            FeatureKind::JobMonitor => "JobMonitor",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

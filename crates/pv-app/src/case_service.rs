//! Case catalog access and the plot endpoints.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pv_core::Real;
use pv_log::{FsLogReader, LogReader};
use pv_project::{
    CaseDef, CaseId, Catalog, FeatureDef, FeatureId, FeatureKind, OptionLookup, OptionScope,
};
use serde::Serialize;

use crate::cache::ResultCache;
use crate::error::{AppError, AppResult};
use crate::feature::{self, Feature, HandlerContext, Plot, PlotData};
use crate::query::TimeWindow;

/// Summary of a case for listing.
#[derive(Debug, Clone, Serialize)]
pub struct CaseSummary {
    pub id: CaseId,
    pub name: String,
    pub owner: String,
    pub feature_count: usize,
    /// `None` when no feature can report one.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Summary of a feature for listing.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureSummary {
    pub id: FeatureId,
    pub kind: FeatureKind,
    pub friendly_name: &'static str,
    pub description: Option<String>,
    pub is_plot: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTime {
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub min_time: Real,
    pub max_time: Real,
}

/// Text form used for `lastUpdated`, e.g. `2013-01-13 11:49:04.123456`.
/// Microsecond precision; the fraction is left out when it is zero.
pub fn format_update_time(time: DateTime<Utc>) -> String {
    let seconds = time.format("%Y-%m-%d %H:%M:%S");
    match time.timestamp_subsec_micros() {
        0 => seconds.to_string(),
        micros => format!("{seconds}.{micros:06}"),
    }
}

/// A loaded catalog plus the services features are built from.
pub struct Workspace {
    catalog: Catalog,
    media_root: PathBuf,
    reader: Arc<dyn LogReader>,
    cache: Arc<ResultCache>,
}

impl Workspace {
    /// Load a catalog file and attach the process-wide cache and the
    /// filesystem reader. `media_root` overrides the catalog's own; a relative
    /// media root in the catalog is taken from the catalog's directory.
    pub fn open(path: &Path, media_root: Option<PathBuf>) -> AppResult<Self> {
        let mut catalog = pv_project::load_catalog(path)?;
        if let (Some(root), Some(dir)) = (catalog.media_root.as_mut(), path.parent()) {
            if root.is_relative() {
                *root = dir.join(&*root);
            }
        }
        let cache = ResultCache::global_with(&catalog.settings);
        Self::new(catalog, media_root, Arc::new(FsLogReader), cache)
    }

    pub fn new(
        catalog: Catalog,
        media_root: Option<PathBuf>,
        reader: Arc<dyn LogReader>,
        cache: Arc<ResultCache>,
    ) -> AppResult<Self> {
        let media_root = media_root
            .or_else(|| catalog.media_root.clone())
            .ok_or_else(|| AppError::Config("no media root configured".to_string()))?;
        Ok(Self {
            catalog,
            media_root,
            reader,
            cache,
        })
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    pub fn case(&self, case_id: CaseId) -> AppResult<&CaseDef> {
        self.catalog
            .case(case_id)
            .ok_or(AppError::CaseNotFound(case_id))
    }

    pub fn feature(&self, case_id: CaseId, feature_id: FeatureId) -> AppResult<CaseFeature<'_>> {
        let def = self
            .case(case_id)?
            .feature(feature_id)
            .ok_or(AppError::FeatureNotFound {
                case_id,
                feature_id,
            })?;
        Ok(CaseFeature {
            workspace: self,
            case_id,
            def,
            handler: OnceCell::new(),
        })
    }

    /// Like [`Workspace::feature`] but only for plot kinds.
    pub fn plot_feature(
        &self,
        case_id: CaseId,
        feature_id: FeatureId,
    ) -> AppResult<CaseFeature<'_>> {
        let feature = self.feature(case_id, feature_id)?;
        if !feature.kind().is_plot() {
            return Err(AppError::NotAPlot {
                kind: feature.kind(),
            });
        }
        Ok(feature)
    }

    pub fn list_cases(&self) -> Vec<CaseSummary> {
        self.catalog
            .cases
            .iter()
            .map(|case| CaseSummary {
                id: case.id,
                name: case.name.clone(),
                owner: case.owner.clone(),
                feature_count: case.features.len(),
                last_updated: self.case_last_update_time(case),
            })
            .collect()
    }

    pub fn list_features(&self, case_id: CaseId) -> AppResult<Vec<FeatureSummary>> {
        let case = self.case(case_id)?;
        case.features
            .iter()
            .map(|def| {
                let feature = self.feature(case_id, def.id)?;
                Ok(FeatureSummary {
                    id: def.id,
                    kind: def.kind,
                    friendly_name: def.kind.friendly_name(),
                    description: feature.description(),
                    is_plot: def.kind.is_plot(),
                })
            })
            .collect()
    }

    /// First feature, in catalog order, that can report an update time.
    pub fn case_last_update_time(&self, case: &CaseDef) -> Option<DateTime<Utc>> {
        for def in &case.features {
            let result = self
                .feature(case.id, def.id)
                .and_then(|f| f.last_update_time());
            match result {
                Ok(time) => return Some(time),
                Err(err) => {
                    tracing::debug!(
                        case_id = case.id,
                        feature_id = def.id,
                        %err,
                        "no update time from feature"
                    );
                }
            }
        }
        None
    }

    /// Plot payload between `start` and `end`, both parsed as numbers first.
    pub fn plot_data(
        &self,
        case_id: CaseId,
        feature_id: FeatureId,
        start: &str,
        end: &str,
    ) -> AppResult<PlotData> {
        let window = TimeWindow::parse(start, end)?;
        let feature = self.plot_feature(case_id, feature_id)?;
        let data = feature.plot()?.series(window)?;
        tracing::info!(
            case_id,
            feature_id,
            start = window.start,
            end = window.end,
            series = data.series_count(),
            "served plot data"
        );
        Ok(data)
    }

    pub fn plot_update_time(
        &self,
        case_id: CaseId,
        feature_id: FeatureId,
    ) -> AppResult<UpdateTime> {
        let feature = self.plot_feature(case_id, feature_id)?;
        Ok(UpdateTime {
            last_updated: format_update_time(feature.last_update_time()?),
        })
    }

    pub fn plot_time_range(&self, case_id: CaseId, feature_id: FeatureId) -> AppResult<TimeRange> {
        let feature = self.plot_feature(case_id, feature_id)?;
        let plot = feature.plot()?;
        Ok(TimeRange {
            min_time: plot.min_time()?,
            max_time: plot.max_time()?,
        })
    }
}

/// A feature of one case with its handler built on first use.
pub struct CaseFeature<'w> {
    workspace: &'w Workspace,
    case_id: CaseId,
    def: &'w FeatureDef,
    handler: OnceCell<Box<dyn Feature>>,
}

impl CaseFeature<'_> {
    pub fn kind(&self) -> FeatureKind {
        self.def.kind
    }

    /// The feature's `description` option, else the kind's built-in text.
    pub fn description(&self) -> Option<String> {
        self.workspace
            .catalog
            .get_option(OptionScope::Feature(self.case_id, self.def.id), "description")
            .map(str::to_string)
            .or_else(|| feature::default_description(self.def.kind).map(str::to_string))
    }

    pub fn handler(&self) -> AppResult<&dyn Feature> {
        if let Some(handler) = self.handler.get() {
            return Ok(handler.as_ref());
        }
        let ctx = HandlerContext {
            options: &self.workspace.catalog,
            media_root: &self.workspace.media_root,
            reader: self.workspace.reader.clone(),
            cache: self.workspace.cache.clone(),
            max_plot_points: self.workspace.catalog.settings.max_plot_points,
            case_id: self.case_id,
            feature_id: self.def.id,
        };
        let built = feature::build_handler(self.def.kind, &ctx)?;
        Ok(self.handler.get_or_init(|| built).as_ref())
    }

    pub fn plot(&self) -> AppResult<&dyn Plot> {
        self.handler()?
            .as_plot()
            .ok_or(AppError::NotAPlot { kind: self.def.kind })
    }

    pub fn last_update_time(&self) -> AppResult<DateTime<Utc>> {
        self.handler()?.last_update_time()
    }
}

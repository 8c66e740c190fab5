//! Feature handlers and their dispatch.
//!
//! Every [`FeatureKind`] maps to exactly one handler type in
//! [`build_handler`]. Plot-capable handlers expose [`Plot`] through
//! [`Feature::as_plot`].

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use pv_core::Real;
use pv_log::{LogReader, TimeSeries};
use pv_project::{CaseId, FeatureId, FeatureKind, OptionLookup};
use serde::Serialize;

use crate::cache::ResultCache;
use crate::error::{AppError, AppResult};
use crate::foam_log::{FoamLog, resolve_log_path};
use crate::query::{self, ResidualSeries, TimeWindow};

/// Behaviour common to every feature attached to a case.
pub trait Feature {
    fn kind(&self) -> FeatureKind;

    /// When the feature's underlying data last changed.
    fn last_update_time(&self) -> AppResult<DateTime<Utc>>;

    /// Plot capabilities, if this feature is a plot.
    fn as_plot(&self) -> Option<&dyn Plot> {
        None
    }
}

/// A feature that renders as a time plot.
pub trait Plot {
    /// Lower bound for the range selector.
    fn min_time(&self) -> AppResult<Real>;

    /// Upper bound for the range selector.
    fn max_time(&self) -> AppResult<Real>;

    /// Plot payload for the requested window.
    fn series(&self, window: TimeWindow) -> AppResult<PlotData>;
}

/// Plot payload. Serialises as a bare JSON array of series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PlotData {
    Residuals(Vec<ResidualSeries>),
    Forces(Vec<TimeSeries>),
}

impl PlotData {
    pub fn series_count(&self) -> usize {
        match self {
            PlotData::Residuals(s) => s.len(),
            PlotData::Forces(s) => s.len(),
        }
    }
}

/// Description shown when a feature has no `description` option.
pub fn default_description(kind: FeatureKind) -> Option<&'static str> {
    if kind.is_plot() {
        Some("Generic data plotting")
    } else {
        None
    }
}

/// Residual convergence plot from a FOAM log.
pub struct ResidualsPlot {
    log: FoamLog,
    max_points: usize,
}

impl ResidualsPlot {
    pub fn new(log: FoamLog, max_points: usize) -> Self {
        Self { log, max_points }
    }
}

impl Feature for ResidualsPlot {
    fn kind(&self) -> FeatureKind {
        FeatureKind::FoamResiduals
    }

    fn last_update_time(&self) -> AppResult<DateTime<Utc>> {
        self.log.last_update_time()
    }

    fn as_plot(&self) -> Option<&dyn Plot> {
        Some(self)
    }
}

impl Plot for ResidualsPlot {
    fn min_time(&self) -> AppResult<Real> {
        self.log.min_time()
    }

    fn max_time(&self) -> AppResult<Real> {
        self.log.max_time()
    }

    fn series(&self, window: TimeWindow) -> AppResult<PlotData> {
        let parsed = self.log.process_log()?;
        Ok(PlotData::Residuals(query::residual_series(
            &parsed,
            window,
            self.max_points,
        )))
    }
}

/// Force coefficient plot from a FOAM log.
pub struct ForcesPlot {
    log: FoamLog,
}

impl ForcesPlot {
    pub fn new(log: FoamLog) -> Self {
        Self { log }
    }
}

impl Feature for ForcesPlot {
    fn kind(&self) -> FeatureKind {
        FeatureKind::FoamForces
    }

    fn last_update_time(&self) -> AppResult<DateTime<Utc>> {
        self.log.last_update_time()
    }

    fn as_plot(&self) -> Option<&dyn Plot> {
        Some(self)
    }
}

impl Plot for ForcesPlot {
    // Range bounds come from the residual series of the same log.
    fn min_time(&self) -> AppResult<Real> {
        self.log.min_time()
    }

    fn max_time(&self) -> AppResult<Real> {
        self.log.max_time()
    }

    fn series(&self, window: TimeWindow) -> AppResult<PlotData> {
        let parsed = self.log.process_log()?;
        Ok(PlotData::Forces(query::force_series(&parsed, window)))
    }
}

/// Galleries, scene listings and the job monitor. Their directory scans and
/// scheduler integration live outside this crate, so only identity is known.
pub struct ExternalFeature {
    kind: FeatureKind,
}

impl Feature for ExternalFeature {
    fn kind(&self) -> FeatureKind {
        self.kind
    }

    fn last_update_time(&self) -> AppResult<DateTime<Utc>> {
        Err(AppError::Unsupported {
            what: format!("last update time for {}", self.kind),
        })
    }
}

/// Everything a handler may need to construct itself.
pub struct HandlerContext<'a> {
    pub options: &'a dyn OptionLookup,
    pub media_root: &'a Path,
    pub reader: Arc<dyn LogReader>,
    pub cache: Arc<ResultCache>,
    pub max_plot_points: usize,
    pub case_id: CaseId,
    pub feature_id: FeatureId,
}

impl HandlerContext<'_> {
    fn foam_log(&self) -> AppResult<FoamLog> {
        let path = resolve_log_path(self.options, self.media_root, self.case_id, self.feature_id)?;
        Ok(FoamLog::new(path, self.reader.clone(), self.cache.clone()))
    }
}

/// Build the handler registered for `kind`.
pub fn build_handler(kind: FeatureKind, ctx: &HandlerContext<'_>) -> AppResult<Box<dyn Feature>> {
    let handler: Box<dyn Feature> = match kind {
        FeatureKind::FoamResiduals => {
            Box::new(ResidualsPlot::new(ctx.foam_log()?, ctx.max_plot_points))
        }
        FeatureKind::FoamForces => Box::new(ForcesPlot::new(ctx.foam_log()?)),
        FeatureKind::ImageGallery
        | FeatureKind::MovieGallery
        | FeatureKind::WebGlScenes
        | FeatureKind::JobMonitor => Box::new(ExternalFeature { kind }),
    };
    Ok(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pv_log::FsLogReader;
    use pv_project::*;

    fn catalog() -> Catalog {
        Catalog {
            version: 1,
            name: "t".to_string(),
            media_root: None,
            settings: PlotSettings::default(),
            cases: vec![CaseDef {
                id: 1,
                name: "c".to_string(),
                owner: "o".to_string(),
                description: String::new(),
                options: vec![OptionDef::new("caseDir", "nowhere")],
                features: vec![],
            }],
        }
    }

    fn ctx(catalog: &Catalog) -> HandlerContext<'_> {
        HandlerContext {
            options: catalog,
            media_root: Path::new("/nonexistent-media"),
            reader: Arc::new(FsLogReader),
            cache: Arc::new(ResultCache::default()),
            max_plot_points: 15_000,
            case_id: 1,
            feature_id: 1,
        }
    }

    #[test]
    fn every_kind_has_a_handler() {
        let catalog = catalog();
        let ctx = ctx(&catalog);
        for kind in FeatureKind::ALL {
            let handler = build_handler(kind, &ctx).unwrap();
            assert_eq!(handler.kind(), kind);
            assert_eq!(handler.as_plot().is_some(), kind.is_plot());
        }
    }

    #[test]
    fn external_features_have_no_update_time() {
        let catalog = catalog();
        let handler = build_handler(FeatureKind::MovieGallery, &ctx(&catalog)).unwrap();
        assert!(matches!(
            handler.last_update_time(),
            Err(AppError::Unsupported { .. })
        ));
    }

    #[test]
    fn plot_descriptions() {
        assert_eq!(
            default_description(FeatureKind::FoamForces),
            Some("Generic data plotting")
        );
        assert_eq!(default_description(FeatureKind::ImageGallery), None);
    }
}

//! Plot endpoints against real log files under a temporary media root.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use pv_app::{AppError, PlotData, ResultCache, Workspace};
use pv_log::{FsLogReader, LogError};
use pv_project::*;

const LOG: &str = "\
/*---------------------------------------------------------------------------*\\
| =========                 |                                                 |
\\*---------------------------------------------------------------------------*/
Starting time loop

Time = 0.001

Courant Number mean: 0.01 max: 0.2
DILUPBiCG:  Solving for Ux, Initial residual = 1, Final residual = 2e-06, No Iterations 2
DILUPBiCG:  Solving for Uy, Initial residual = 0.9, Final residual = 3e-06, No Iterations 2
GAMG:  Solving for p, Initial residual = 1, Final residual = 0.001, No Iterations 12
forceCoeffs output:
    Cm    = 0.01
    Cd    = 1.5
    Cl    = 0.3

ExecutionTime = 0.5 s  ClockTime = 1 s

Time = 0.002

DILUPBiCG:  Solving for Ux, Initial residual = 0.5, Final residual = 1e-06, No Iterations 2
DILUPBiCG:  Solving for Uy, Initial residual = 0.4, Final residual = 1e-06, No Iterations 2
forceCoeffs output:
    Cm    = 0.02
    Cd    = 1.4
    Cl    = 0.35

End
";

fn media_root(test: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!("pv_app_{test}"));
    let _ = fs::remove_dir_all(&root);
    fs::create_dir_all(root.join("runs/wing")).unwrap();
    fs::write(root.join("runs/wing/log.pisoFoam"), LOG).unwrap();
    root
}

fn catalog() -> Catalog {
    Catalog {
        version: 1,
        name: "Plot tests".to_string(),
        media_root: None,
        settings: PlotSettings::default(),
        cases: vec![
            CaseDef {
                id: 1,
                name: "Wing".to_string(),
                owner: "irvine".to_string(),
                description: String::new(),
                options: vec![OptionDef::new("caseDir", "/runs/wing")],
                features: vec![
                    FeatureDef {
                        id: 10,
                        kind: FeatureKind::ImageGallery,
                        options: vec![OptionDef::new("description", "Surface plots")],
                    },
                    FeatureDef {
                        id: 11,
                        kind: FeatureKind::FoamResiduals,
                        options: vec![],
                    },
                    FeatureDef {
                        id: 12,
                        kind: FeatureKind::FoamForces,
                        options: vec![],
                    },
                    FeatureDef {
                        id: 13,
                        kind: FeatureKind::FoamResiduals,
                        options: vec![OptionDef::new("logFile", "log.missing")],
                    },
                ],
            },
            CaseDef {
                id: 2,
                name: "Unconfigured".to_string(),
                owner: "irvine".to_string(),
                description: String::new(),
                options: vec![],
                features: vec![FeatureDef {
                    id: 20,
                    kind: FeatureKind::FoamForces,
                    options: vec![],
                }],
            },
        ],
    }
}

fn workspace(test: &str) -> Workspace {
    Workspace::new(
        catalog(),
        Some(media_root(test)),
        Arc::new(FsLogReader),
        Arc::new(ResultCache::new(Duration::from_secs(120), 8)),
    )
    .unwrap()
}

#[test]
fn residual_plot_data() {
    let ws = workspace("residuals");
    let data = ws.plot_data(1, 11, "0", "1").unwrap();

    let PlotData::Residuals(series) = &data else {
        panic!("expected residual data, got {data:?}");
    };
    let keys: Vec<&str> = series.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["Ux", "Uy"]);
    assert_eq!(series[0].values.len(), 2);
    assert_eq!(series[0].values[1].x, 0.002);
    assert_eq!(series[0].values[1].y, 0.5);

    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json[1]["key"], "Uy");
    assert_eq!(json[1]["values"][0]["x"], 0.001);
    assert_eq!(json[1]["values"][0]["y"], 0.9);
}

#[test]
fn force_plot_data() {
    let ws = workspace("forces");
    let data = ws.plot_data(1, 12, "0.0015", "1").unwrap();

    let PlotData::Forces(series) = &data else {
        panic!("expected force data, got {data:?}");
    };
    let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Cd", "Cl", "Cm"]);
    assert_eq!(series[0].data, vec![(0.002, 1.4)]);

    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json[1]["name"], "Cl");
    assert_eq!(json[1]["data"][0][1], 0.35);
}

#[test]
fn start_past_all_data_is_empty_not_error() {
    let ws = workspace("past_end");
    let data = ws.plot_data(1, 11, "5", "10").unwrap();
    let PlotData::Residuals(series) = data else {
        panic!("expected residual data");
    };
    assert!(series.iter().all(|s| s.values.is_empty()));
}

#[test]
fn time_range_and_update_time() {
    let ws = workspace("range");
    let range = ws.plot_time_range(1, 12).unwrap();
    assert_eq!(range.min_time, 0.001);
    assert_eq!(range.max_time, 0.002);

    let json = serde_json::to_value(&range).unwrap();
    assert_eq!(json["minTime"], 0.001);
    assert_eq!(json["maxTime"], 0.002);

    let updated = ws.plot_update_time(1, 11).unwrap();
    assert!(updated.last_updated.starts_with("20"));
    let json = serde_json::to_value(&updated).unwrap();
    assert!(json.get("lastUpdated").is_some());
}

#[test]
fn repeated_queries_share_one_cache_entry() {
    let ws = workspace("shared_cache");
    ws.plot_data(1, 11, "0", "1").unwrap();
    ws.plot_data(1, 12, "0", "1").unwrap();
    ws.plot_time_range(1, 11).unwrap();
    assert_eq!(ws.cache().len(), 1);
}

#[test]
fn non_numeric_range_rejected_before_lookup() {
    let ws = workspace("bad_range");
    let err = ws.plot_data(1, 999, "soon", "1").unwrap_err();
    assert!(matches!(err, AppError::InvalidRange { .. }));
}

#[test]
fn gallery_is_not_a_plot() {
    let ws = workspace("not_plot");
    let err = ws.plot_time_range(1, 10).unwrap_err();
    assert!(matches!(
        err,
        AppError::NotAPlot {
            kind: FeatureKind::ImageGallery
        }
    ));
}

#[test]
fn unknown_case_and_feature() {
    let ws = workspace("unknown");
    assert!(matches!(
        ws.plot_time_range(9, 1),
        Err(AppError::CaseNotFound(9))
    ));
    assert!(matches!(
        ws.plot_time_range(1, 99),
        Err(AppError::FeatureNotFound { .. })
    ));
}

#[test]
fn missing_log_surfaces_not_found() {
    let ws = workspace("missing_log");
    let err = ws.plot_data(1, 13, "0", "1").unwrap_err();
    assert!(matches!(err, AppError::Log(LogError::NotFound { .. })));
    assert!(ws.cache().is_empty());
}

#[test]
fn missing_case_dir_surfaces_config_error() {
    let ws = workspace("missing_case_dir");
    let err = ws.plot_data(2, 20, "0", "1").unwrap_err();
    assert!(matches!(err, AppError::MissingOption { .. }));
}

#[test]
fn case_update_time_skips_features_without_one() {
    let ws = workspace("case_update");
    let cases = ws.list_cases();
    assert_eq!(cases.len(), 2);
    assert!(cases[0].last_updated.is_some());
    assert!(cases[1].last_updated.is_none());
}

#[test]
fn feature_listing() {
    let ws = workspace("listing");
    let features = ws.list_features(1).unwrap();
    assert_eq!(features.len(), 4);
    assert_eq!(features[0].friendly_name, "Images");
    assert_eq!(features[0].description.as_deref(), Some("Surface plots"));
    assert!(!features[0].is_plot);
    assert_eq!(features[1].friendly_name, "Residuals");
    assert_eq!(
        features[1].description.as_deref(),
        Some("Generic data plotting")
    );
}

#[test]
fn media_root_is_required() {
    let result = Workspace::new(
        catalog(),
        None,
        Arc::new(FsLogReader),
        Arc::new(ResultCache::default()),
    );
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn relative_media_root_resolves_against_catalog_directory() {
    let dir = std::env::temp_dir().join("pv_app_relative_root");
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("media/runs/wing")).unwrap();
    fs::write(dir.join("media/runs/wing/log.pisoFoam"), LOG).unwrap();

    let mut cat = catalog();
    cat.media_root = Some(PathBuf::from("media"));
    let catalog_path = dir.join("catalog.yaml");
    save_yaml(&catalog_path, &cat).unwrap();

    let ws = Workspace::open(&catalog_path, None).unwrap();
    let range = ws.plot_time_range(1, 11).unwrap();
    assert_eq!(range.min_time, 0.001);
    assert_eq!(range.max_time, 0.002);
}

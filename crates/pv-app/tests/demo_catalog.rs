//! Smoke test over the demo catalog shipped in `demos/`.

use std::path::PathBuf;

use pv_app::{PlotData, Workspace};

fn demos_dir() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // go to crates
    dir.pop(); // go to repo root
    dir.push("demos");
    dir
}

#[test]
fn demo_catalog_plots() {
    let demos = demos_dir();
    let catalog_path = demos.join("catalog.yaml");
    if !catalog_path.exists() {
        eprintln!("Skipping test: demo catalog not found at {:?}", catalog_path);
        return;
    }

    // The catalog's relative media root resolves against demos/, not the test's cwd.
    let ws = Workspace::open(&catalog_path, None).expect("demo catalog loads");

    let range = ws.plot_time_range(1, 1).unwrap();
    assert_eq!(range.min_time, 0.001);
    assert_eq!(range.max_time, 0.02);

    match ws.plot_data(1, 1, "0", "1").unwrap() {
        PlotData::Residuals(series) => {
            assert_eq!(series.len(), 2);
            assert!(series.iter().all(|s| s.values.len() == 20));
        }
        other => panic!("expected residuals, got {:?}", other),
    }

    match ws.plot_data(1, 2, "0.005", "0.010").unwrap() {
        PlotData::Forces(series) => {
            assert_eq!(series.len(), 3);
            assert!(series.iter().all(|s| s.data.len() == 6));
        }
        other => panic!("expected forces, got {:?}", other),
    }

    let features = ws.list_features(1).unwrap();
    assert_eq!(
        features[1].description.as_deref(),
        Some("Lift, drag and moment coefficients")
    );
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use pv_app::{AppError, AppResult, Workspace};
use pv_core::timing;
use pv_log::{FsLogReader, LogPath};
use pv_project::{CaseId, FeatureId};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pv-cli")]
#[command(about = "Percyval CLI - simulation case tracker and solver log plots", long_about = None)]
struct Cli {
    /// Override the catalog's media root
    #[arg(long, global = true)]
    media_root: Option<PathBuf>,
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
    /// Print parse and cache timings to stderr
    #[arg(long, global = true)]
    timing: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate catalog file syntax and structure
    Validate {
        /// Path to the catalog YAML or JSON file
        catalog: PathBuf,
    },
    /// List cases with their last update time
    Cases {
        /// Path to the catalog YAML or JSON file
        catalog: PathBuf,
    },
    /// List the features of a case
    Features {
        /// Path to the catalog YAML or JSON file
        catalog: PathBuf,
        case_id: CaseId,
    },
    /// Plot series between two times
    PlotData {
        /// Path to the catalog YAML or JSON file
        catalog: PathBuf,
        case_id: CaseId,
        feature_id: FeatureId,
        start_time: String,
        end_time: String,
    },
    /// Time the plot's log was last modified
    UpdateTime {
        /// Path to the catalog YAML or JSON file
        catalog: PathBuf,
        case_id: CaseId,
        feature_id: FeatureId,
    },
    /// First and last time step available to a plot
    TimeRange {
        /// Path to the catalog YAML or JSON file
        catalog: PathBuf,
        case_id: CaseId,
        feature_id: FeatureId,
    },
    /// Parse a solver log directly and dump every series
    Parse {
        /// Path to the solver log
        log: PathBuf,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> AppResult<()> {
    init_logging();

    let cli = Cli::parse();
    if cli.timing {
        timing::enable_timing();
    }
    let media_root = cli.media_root;
    let pretty = cli.pretty;

    match cli.command {
        Commands::Validate { catalog } => cmd_validate(&catalog)?,
        Commands::Cases { catalog } => {
            let ws = Workspace::open(&catalog, media_root)?;
            emit(&ws.list_cases(), pretty)?;
        }
        Commands::Features { catalog, case_id } => {
            let ws = Workspace::open(&catalog, media_root)?;
            emit(&ws.list_features(case_id)?, pretty)?;
        }
        Commands::PlotData {
            catalog,
            case_id,
            feature_id,
            start_time,
            end_time,
        } => {
            let ws = Workspace::open(&catalog, media_root)?;
            emit(
                &ws.plot_data(case_id, feature_id, &start_time, &end_time)?,
                pretty,
            )?;
        }
        Commands::UpdateTime {
            catalog,
            case_id,
            feature_id,
        } => {
            let ws = Workspace::open(&catalog, media_root)?;
            emit(&ws.plot_update_time(case_id, feature_id)?, pretty)?;
        }
        Commands::TimeRange {
            catalog,
            case_id,
            feature_id,
        } => {
            let ws = Workspace::open(&catalog, media_root)?;
            emit(&ws.plot_time_range(case_id, feature_id)?, pretty)?;
        }
        Commands::Parse { log } => {
            let parsed = pv_log::parse_log(&FsLogReader, &LogPath::new(log))?;
            emit(&parsed, pretty)?;
        }
    }

    if let Some(summary) = timing::log_timing::summary() {
        eprint!("{}", summary);
    }
    Ok(())
}

fn cmd_validate(catalog_path: &Path) -> AppResult<()> {
    eprintln!("Validating catalog: {}", catalog_path.display());
    let catalog = pv_project::load_catalog(catalog_path)?;
    eprintln!(
        "✓ Catalog is valid ({} cases, {} features)",
        catalog.cases.len(),
        catalog.cases.iter().map(|c| c.features.len()).sum::<usize>()
    );
    Ok(())
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> AppResult<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

//! CLI entry point for the walksignal tool.
//!
//! Provides subcommands for listing the cells seen in a set of measurement
//! logs, summarising their signal statistics, and comparing a cell's
//! empirical path loss against the analytical propagation models.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use walksignal::{
    comparison::compare,
    config::ModelConfig,
    dataset::Dataset,
    output::{append_curves, append_points, print_pretty, write_json},
};

#[derive(Parser)]
#[command(name = "walksignal")]
#[command(about = "Compare measured cellular path loss against propagation models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct DataArgs {
    /// Measurement CSV file; repeat to pool several runs
    #[arg(short, long = "data", value_name = "FILE")]
    data: Vec<PathBuf>,

    /// Reference cell table (OpenCellID CSV)
    #[arg(short, long)]
    reference: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the unique cells seen in the measurement files
    Cells {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Summarise signal statistics for the dataset and each cell
    Stats {
        #[command(flatten)]
        data: DataArgs,
    },
    /// Compare one cell's empirical path loss with every model
    Compare {
        /// Cell identifier to compare
        #[arg(long)]
        cell: u64,

        /// JSON model configuration
        #[arg(short, long, default_value = "walksignal.json")]
        config: PathBuf,

        #[command(flatten)]
        data: DataArgs,

        /// Write the full comparison as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Append empirical points to this CSV file
        #[arg(long)]
        points_csv: Option<PathBuf>,

        /// Append model curves to this CSV file
        #[arg(long)]
        curves_csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/walksignal.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("walksignal.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cells { data } => {
            let dataset = load_dataset(&data.data, data.reference.as_deref())?;

            for group in dataset.cell_groups() {
                let reference = dataset.reference_for_cell(group.cellid());
                info!(
                    cell = %group.key(),
                    rows = group.len(),
                    has_reference = reference.is_some(),
                    radio = reference.map(|r| r.radio.as_str()).unwrap_or("-"),
                    "Cell"
                );
            }

            info!(
                cells = dataset.unique_cell_ids().len(),
                rows = dataset.rows().len(),
                "Cell list summary"
            );
        }
        Commands::Stats { data } => {
            let dataset = load_dataset(&data.data, data.reference.as_deref())?;

            let overall = dataset.signal_stats();
            info!(
                rows = overall.count,
                mean_dbm = overall.mean_dbm,
                stddev_db = overall.stddev_db,
                "Dataset signal"
            );
            if let Some(span) = dataset.time_span() {
                info!(
                    start = %span.start,
                    end = %span.end,
                    duration_secs = span.duration_secs(),
                    "Measurement window"
                );
            }

            for group in dataset.cell_groups() {
                let stats = group.signal_stats();
                info!(
                    cell = %group.key(),
                    rows = stats.count,
                    mean_dbm = stats.mean_dbm,
                    stddev_db = stats.stddev_db,
                    min_dbm = stats.min_dbm,
                    max_dbm = stats.max_dbm,
                    "Cell signal"
                );
            }
        }
        Commands::Compare {
            cell,
            config,
            data,
            json,
            points_csv,
            curves_csv,
        } => {
            let config = ModelConfig::load(&config)
                .with_context(|| format!("loading config {}", config.display()))?;

            let files = if data.data.is_empty() {
                config.signal_data_files.clone()
            } else {
                data.data
            };
            let reference = data.reference.or_else(|| config.reference_file.clone());
            let dataset = load_dataset(&files, reference.as_deref())?;

            let comparison = compare(&dataset, cell, &config)?;
            if comparison.empirical.is_empty() {
                warn!(cell_id = cell, "No tower position; only model curves were produced");
            }
            print_pretty(&comparison);

            if let Some(path) = json {
                write_json(&path, &comparison)?;
            }
            if let Some(path) = points_csv {
                append_points(&path, &comparison)?;
            }
            if let Some(path) = curves_csv {
                append_curves(&path, &comparison)?;
            }
        }
    }

    Ok(())
}

/// Loads the measurement files and, when given, joins the reference table.
#[tracing::instrument(skip_all, fields(files = files.len()))]
fn load_dataset(files: &[PathBuf], reference: Option<&Path>) -> Result<Dataset> {
    if files.is_empty() {
        bail!("no measurement files given; pass --data or set signal_data_files");
    }

    let dataset = Dataset::load(files)?;
    match reference {
        Some(path) => Ok(dataset.load_reference(path)?),
        None => Ok(dataset),
    }
}

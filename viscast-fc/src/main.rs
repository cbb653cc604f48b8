//! viscast-fc - Visibility Forecast CLI
//!
//! Entry point wiring the site registry, the environmental snapshot, the
//! dive log, and the scoring pipeline into the text forecast surface.
//! Every forecast is computed fresh from a point-in-time snapshot of
//! inputs; the dive log is the only state that grows between runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use viscast_common::config;
use viscast_common::models::DiveLogEntry;
use viscast_common::time;
use viscast_fc::accuracy::{accuracy_report, PredictionLog};
use viscast_fc::forecast::build_forecast;
use viscast_fc::logstore::DiveLogStore;
use viscast_fc::providers::SnapshotBuilder;
use viscast_fc::render;
use viscast_fc::sites::SiteRegistry;

/// Command-line arguments for viscast-fc
#[derive(Parser, Debug)]
#[command(name = "viscast-fc")]
#[command(about = "Dive site visibility forecast")]
#[command(version)]
struct Cli {
    /// Config file path (default: platform config dir)
    #[arg(short, long, env = "VISCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Data folder holding the dive log and prediction log
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Skip all environmental fetches and use documented defaults
    #[arg(long)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute and print today's forecast (the default)
    Forecast,
    /// Append a dive to the log
    Log {
        /// Site name (should match a registry site to count for calibration)
        #[arg(long)]
        site: String,
        /// Observed visibility bucket, e.g. "6-8 ft"
        #[arg(long)]
        visibility: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, default_value = "")]
        catch: String,
    },
    /// Compare past predictions against logged observations
    Accuracy,
    /// List the configured dive sites
    Sites,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_toml_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let default_filter = format!(
        "viscast_fc={level},viscast_common={level}",
        level = config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_filter)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting viscast-fc");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let registry = SiteRegistry::from_config(config.sites.clone())
        .context("Failed to build site registry")?;
    info!("Site registry: {} sites", registry.len());

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref(), &config);
    config::ensure_data_dir(&data_dir)
        .with_context(|| format!("Failed to initialize data folder {}", data_dir.display()))?;
    info!("Data folder: {}", data_dir.display());

    let dive_log = DiveLogStore::new(config::dive_log_path(&data_dir, &config));
    let prediction_log = PredictionLog::new(config::prediction_path(&data_dir, &config));

    match cli.command.unwrap_or(Command::Forecast) {
        Command::Forecast => {
            run_forecast(&config, &registry, &dive_log, &prediction_log, cli.offline).await
        }
        Command::Log {
            site,
            visibility,
            notes,
            catch,
        } => run_log(&registry, &dive_log, site, visibility, notes, catch),
        Command::Accuracy => run_accuracy(&dive_log, &prediction_log),
        Command::Sites => {
            run_sites(&registry);
            Ok(())
        }
    }
}

async fn run_forecast(
    config: &config::TomlConfig,
    registry: &SiteRegistry,
    dive_log: &DiveLogStore,
    prediction_log: &PredictionLog,
    offline: bool,
) -> Result<()> {
    let snapshot = if offline {
        info!("Offline mode: using documented default conditions");
        SnapshotBuilder::offline()
    } else {
        let builder = SnapshotBuilder::from_config(config)
            .context("Failed to build environmental clients")?;
        builder.build().await
    };

    // A log read failure degrades to uncalibrated scores, never a dead run
    let entries = match dive_log.read_all() {
        Ok(entries) => entries,
        Err(e) => {
            warn!(error = %e, "Dive log unreadable; forecasting without calibration");
            Vec::new()
        }
    };

    let rows = build_forecast(registry, &snapshot, &entries)?;

    // Prediction history is best-effort from the forecast path
    if let Err(e) = prediction_log.record_run(&time::log_date(), &rows) {
        warn!(error = %e, "Could not record predictions");
    }

    print!("{}", render::render_forecast(registry, &snapshot, &rows));
    Ok(())
}

fn run_log(
    registry: &SiteRegistry,
    dive_log: &DiveLogStore,
    site: String,
    visibility: String,
    notes: String,
    catch: String,
) -> Result<()> {
    if registry.lookup(&site).is_err() {
        warn!(site = %site, "Site is not in the registry; the dive will be logged but ignored by calibration");
    }
    let entry = DiveLogEntry {
        date: time::log_date(),
        time: time::log_time(),
        site,
        visibility,
        notes,
        catch,
        extras: Vec::new(),
    };
    if entry.bucket().is_none() {
        warn!(visibility = %entry.visibility.trim(),
            "Visibility does not match a known bucket; the dive will be logged but ignored by calibration");
    }

    dive_log
        .append(&entry)
        .with_context(|| format!("Failed to append to {}", dive_log.path().display()))?;
    println!("Logged {} at {} ({})", entry.visibility.trim(), entry.site, entry.date);
    Ok(())
}

fn run_accuracy(dive_log: &DiveLogStore, prediction_log: &PredictionLog) -> Result<()> {
    let predictions = prediction_log
        .read_all()
        .context("Failed to read prediction history")?;
    let entries = dive_log.read_all().context("Failed to read dive log")?;
    let report = accuracy_report(&predictions, &entries);
    println!("{}", render::accuracy_table(&report));
    Ok(())
}

fn run_sites(registry: &SiteRegistry) {
    for site in registry.sites() {
        let camera = site
            .camera_url
            .as_deref()
            .map(|url| format!("  cam: {}", url))
            .unwrap_or_default();
        println!(
            "{}  (base {}, exposure {:.1}, runoff {:.1}, kelp {:.1}){}",
            site.name,
            site.base_score,
            site.swell_exposure,
            site.runoff_sensitivity,
            site.kelp_index,
            camera,
        );
    }
}

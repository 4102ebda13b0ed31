//! LexiLens command line tool
//!
//! Replays recorded ROI gesture scripts against the geometry core and
//! manages the configuration file.

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use lexilens::config::{self, AppConfig};
use lexilens::replay::replay;
use lexilens::storage;

/// LexiLens - ROI geometry and annotation placement core
#[derive(Parser, Debug)]
#[command(name = "lexilens")]
#[command(about = "Replay ROI gesture scripts and inspect the resulting recognition regions")]
struct Args {
    /// Gesture script (JSON) to replay
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Write the default configuration to the config path and exit
    #[arg(long)]
    write_default_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => storage::default_config_path()?,
    };

    if args.write_default_config {
        config::save_config(&AppConfig::default(), &config_path)?;
        println!("Wrote default configuration to {}", config_path.display());
        return Ok(());
    }

    let config = load_or_default_config(&config_path, args.config.is_some())?;

    if args.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(script_path) = args.script else {
        println!("Nothing to do. Pass --script <file> to replay a gesture script.");
        return Ok(());
    };

    let script = storage::scripts::load_script(&script_path)?;
    info!("Replaying {:?}", script_path);

    for frame in replay(&script, &config) {
        println!(
            "[{}] {}\n    container {}x{}  roi x={:.1} y={:.1} w={:.1} h={:.1}  \
             normalized x={:.4} y={:.4} w={:.4} h={:.4}",
            frame.step,
            frame.description,
            frame.container.width,
            frame.container.height,
            frame.roi.x,
            frame.roi.y,
            frame.roi.width,
            frame.roi.height,
            frame.region.x,
            frame.region.y,
            frame.region.width,
            frame.region.height,
        );
    }

    Ok(())
}

/// Load configuration from file, falling back to defaults when it is absent.
///
/// An explicitly requested file must exist and parse.
fn load_or_default_config(path: &Path, explicit: bool) -> Result<AppConfig> {
    if explicit || path.exists() {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }
    info!("Using default configuration");
    Ok(AppConfig::default())
}

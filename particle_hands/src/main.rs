//! particle_hands: interactive entry point.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use particle_hands::app::run;
use particle_hands::{AppConfig, AppError};

#[derive(Parser, Debug)]
#[command(name = "particle_hands", about = "Hand-gesture driven particle field")]
struct Cli {
    /// Config file (default: ~/.particle_hands/config.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the particle count
    #[arg(long)]
    particles: Option<usize>,

    /// Override the simulated detector rate in Hz
    #[arg(long)]
    detector_hz: Option<f32>,

    /// Use the reduced particle count
    #[arg(long)]
    compact: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "particle_hands=info,hand_signal=info,particle_control=info".into()
            }),
        )
        .init();

    if let Err(e) = start(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn start(cli: Cli) -> Result<(), AppError> {
    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    if cli.compact {
        cfg.view.compact = true;
    }
    if let Some(n) = cli.particles {
        cfg.view.particle_count = Some(n);
    }
    if let Some(hz) = cli.detector_hz {
        cfg.view.detector_hz = hz;
    }
    cfg.validate()?;

    if cli.print_config {
        print!("{}", cfg.to_toml()?);
        return Ok(());
    }

    info!("particle_hands v{} starting", env!("CARGO_PKG_VERSION"));
    run(cfg)
}

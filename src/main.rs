use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pupper_fk_runtime::config::{self, RuntimeConfig};

/// Forward kinematics sampler for the quadruped legs
///
/// Reads joint states as JSON lines on stdin, e.g.
/// {"name": ["leg_front_l_1", ...], "position": [0.0, ...]}
/// and prints one position sample per tick on stdout.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with the leg definitions (defaults to the Pupper left legs)
    #[arg(long)]
    geometry: Option<PathBuf>,

    /// Append-only record log
    #[arg(long, default_value = config::LOG_PATH)]
    log: PathBuf,

    /// Sampling rate in Hz
    #[arg(long, default_value_t = config::LOOP_HZ)]
    hz: u64,

    /// Stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,
}

#[tokio::main]
async fn main() {
    // Setup logging on stderr (set RUST_LOG=info or debug); stdout carries samples
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let legs = match &args.geometry {
        Some(path) => match config::load_legs(path) {
            Ok(legs) => legs,
            Err(e) => {
                eprintln!("Geometry error ({}): {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => config::default_legs(),
    };

    let config = RuntimeConfig {
        loop_hz: args.hz,
        log_path: args.log,
        max_ticks: args.ticks,
        legs,
    };

    if let Err(e) = pupper_fk_runtime::runtime::run(config).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}

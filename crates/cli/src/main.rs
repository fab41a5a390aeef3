//! Command-line front end for the action engine.
//!
//! Inspects action catalogues and runs scenarios headless:
//!
//! ```bash
//! action-cli inspect --data-dir data
//! action-cli simulate --data-dir data --world camp --ticks 20 --dt 0.5 --save camp.json
//! ```

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Inspect, Simulate};

/// Action engine tools
#[derive(Parser)]
#[command(name = "action-cli")]
#[command(about = "Inspect action catalogues and simulate scenarios", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List the action prototypes of a data directory
    Inspect(Inspect),

    /// Run a scenario for a number of ticks
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for ACTION_DATA_DIR and RUST_LOG)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Inspect(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
    }
}

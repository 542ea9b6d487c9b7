//! almeria CLI binary.
//!
//! Runs the long/short spread engine over a CSV panel.

mod cmd;
mod config;
mod data;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;

use crate::cmd::backtest::BacktestArgs;
use crate::cmd::ic::IcArgs;

#[derive(Parser)]
#[command(name = "almeria")]
#[command(about = "Cross-sectional long/short spread engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the daily long/short spread and its performance
    Backtest(BacktestArgs),

    /// Information coefficient of the scores against forward returns
    Ic(IcArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if cli.log_json {
        logging::init_json_logging();
    } else {
        logging::init_logging();
    }

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Backtest(args) => cmd::backtest::run_backtest(args).await,
        Commands::Ic(args) => cmd::ic::run_ic(args).await,
    }
}

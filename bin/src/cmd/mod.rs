//! CLI subcommand modules.

pub(crate) mod backtest;
pub(crate) mod ic;

use almeria_engine::{SpreadEngine, SpreadReport};
use almeria_traits::Panel;
use anyhow::{Result, anyhow};
use clap::ValueEnum;
use std::time::Duration;

/// How results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Run the engine off the async runtime, optionally bounded in time.
///
/// The engine is CPU-bound, so it runs on the blocking pool rather than a
/// runtime worker.
pub(crate) async fn run_engine(
    engine: SpreadEngine,
    panel: Panel,
    timeout: Option<Duration>,
) -> Result<SpreadReport> {
    let task = tokio::task::spawn_blocking(move || engine.run(&panel));
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| anyhow!("engine run exceeded {}s", limit.as_secs()))?,
        None => task.await,
    };

    Ok(joined??)
}

//! IC command implementation.

use std::path::PathBuf;

use almeria_engine::{
    CrossSection, EngineConfig, cross_sections, cross_sections_in_universe, resolve_duplicates,
};
use almeria_eval::{DailyIc, IcSummary, ic_series};
use almeria_traits::{Panel, SignalProvider};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::warn;

use crate::cmd::OutputFormat;
use crate::config::EngineArgs;
use crate::data::CsvPanel;

/// Arguments of `almeria ic`.
#[derive(Debug, Args)]
pub(crate) struct IcArgs {
    /// CSV panel with one row per (date, asset)
    panel: PathBuf,

    #[command(flatten)]
    engine: EngineArgs,

    /// Minimum dates with a defined IC for the summary
    #[arg(long, default_value_t = 20)]
    min_periods: usize,

    /// Print the IC of every date
    #[arg(short, long)]
    verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct IcOutput {
    summary: IcSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    daily: Vec<DailyIc>,
}

/// Compute the per-date IC of a CSV panel and summarize it.
pub(crate) async fn run_ic(args: IcArgs) -> Result<()> {
    let config = args.engine.resolve()?;

    let provider = CsvPanel::new(&args.panel);
    let name = provider.name().to_string();
    let panel = tokio::task::spawn_blocking(move || provider.panel())
        .await?
        .with_context(|| format!("cannot load panel {name}"))?;

    let sections = ranked_sections(&panel, &config)?;
    let daily = ic_series(&sections);
    let summary = IcSummary::calculate(&daily, args.min_periods);

    match args.format {
        OutputFormat::Json => {
            let output = IcOutput {
                summary,
                daily: if args.verbose { daily } else { Vec::new() },
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!("\n╔══════════════════════════════════════════════════════════════╗");
            println!("║                  Information Coefficient                     ║");
            println!("╚══════════════════════════════════════════════════════════════╝\n");

            println!("Panel:      {}", args.panel.display());
            println!("Dates:      {}", daily.len());
            println!("Valid ICs:  {}", summary.n_obs);
            println!("Mean IC:    {:+.4}", summary.mean_ic);
            println!("IC std:     {:.4}", summary.std_ic);
            println!("IR:         {:+.3}", summary.ir);
            println!("IC > 0:     {:.1}%", summary.hit_rate * 100.0);

            if args.verbose {
                println!();
                println!("{:<12} {:>8} {:>8}", "date", "ic", "assets");
                for d in &daily {
                    println!("{:<12} {:>+8.4} {:>8}", d.date.to_string(), d.ic, d.n_assets);
                }
            }
            println!();
        }
    }

    Ok(())
}

/// Cross-sections as the engine would see them, minus dates it would skip
/// for duplicate assets.
fn ranked_sections(panel: &Panel, config: &EngineConfig) -> Result<Vec<CrossSection>> {
    let observations = panel.observations(&config.columns)?;
    let outcome = match &config.universe {
        Some(universe) => {
            let keys = panel.values(&universe.column)?;
            cross_sections_in_universe(&observations, &keys, universe)
        }
        None => cross_sections(&observations),
    };

    Ok(outcome
        .sections
        .into_iter()
        .filter_map(|section| {
            let date = section.date;
            resolve_duplicates(section, config.duplicate_policy)
                .inspect_err(|reason| warn!(%date, %reason, "skipping date"))
                .ok()
        })
        .collect())
}

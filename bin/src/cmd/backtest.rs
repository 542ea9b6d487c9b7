//! Backtest command implementation.

use std::path::PathBuf;
use std::time::Duration;

use almeria_engine::{EngineConfig, SpreadEngine, SpreadReport};
use almeria_eval::{
    PerformanceConfig, PerformanceSummary, SampleSplit, equal_weight_benchmark, excess_returns,
};
use almeria_traits::{DailyReturn, Panel, SignalProvider, SkippedDate};
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tracing::{info, warn};

use crate::cmd::{OutputFormat, run_engine};
use crate::config::EngineArgs;
use crate::data::{self, CsvPanel};

/// Arguments of `almeria backtest`.
#[derive(Debug, Args)]
pub(crate) struct BacktestArgs {
    /// CSV panel with one row per (date, asset)
    panel: PathBuf,

    #[command(flatten)]
    engine: EngineArgs,

    /// First out-of-sample date (YYYY-MM-DD); runs each half separately
    #[arg(long)]
    split: Option<String>,

    /// Also report the equal-weight universe benchmark
    #[arg(long)]
    benchmark: bool,

    /// Starting capital for the compounded equity curve
    #[arg(long, default_value_t = 1_000.0)]
    initial_capital: f64,

    /// Write the daily series to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Abort an engine run that takes longer than this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Results of one engine run.
#[derive(Debug, Serialize)]
struct SectionOutput {
    label: String,
    gross: PerformanceSummary,
    net: PerformanceSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    benchmark: Option<PerformanceSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    excess: Option<PerformanceSummary>,
    dropped_observations: usize,
    outside_universe: usize,
    skipped: Vec<SkippedDate>,
}

#[derive(Debug, Serialize)]
struct BacktestOutput<'a> {
    panel: String,
    config: &'a EngineConfig,
    sections: Vec<SectionOutput>,
}

/// Run the spread engine on a CSV panel and print its performance.
pub(crate) async fn run_backtest(args: BacktestArgs) -> Result<()> {
    let config = args.engine.resolve()?;
    let split_date = args.split.as_deref().map(data::parse_date).transpose()?;

    let provider = CsvPanel::new(&args.panel);
    let name = provider.name().to_string();
    let panel = tokio::task::spawn_blocking(move || provider.panel())
        .await?
        .with_context(|| format!("cannot load panel {name}"))?;

    let engine = SpreadEngine::new(config.clone())?;
    let timeout = args.timeout_secs.map(Duration::from_secs);
    let perf = PerformanceConfig {
        initial_capital: args.initial_capital,
        ..Default::default()
    };

    let runs: Vec<(String, Panel)> = match split_date {
        Some(split) => {
            let halves = SampleSplit::at(&panel, &config.columns.date, split)?;
            if halves.in_sample.is_empty() || halves.out_of_sample.is_empty() {
                warn!(%split, "split date leaves one half of the panel empty");
            }
            vec![
                ("in-sample".to_string(), halves.in_sample),
                ("out-of-sample".to_string(), halves.out_of_sample),
            ]
        }
        None => vec![("full sample".to_string(), panel)],
    };

    let mut sections = Vec::with_capacity(runs.len());
    let mut reports = Vec::with_capacity(runs.len());
    for (label, panel) in runs {
        let benchmark = if args.benchmark {
            Some(equal_weight_benchmark(&panel.observations(&config.columns)?))
        } else {
            None
        };

        let report = run_engine(engine.clone(), panel, timeout).await?;
        info!(section = %label, days = report.len(), "section complete");

        sections.push(summarize(label, &report, benchmark.as_deref(), &perf));
        reports.push(report);
    }

    if let Some(path) = &args.output {
        write_series(&reports, path)?;
        info!(path = %path.display(), "wrote daily series");
    }

    match args.format {
        OutputFormat::Json => {
            let output = BacktestOutput {
                panel: args.panel.display().to_string(),
                config: &config,
                sections,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_text(&args.panel, &config, &sections),
    }

    Ok(())
}

fn summarize(
    label: String,
    report: &SpreadReport,
    benchmark: Option<&[DailyReturn]>,
    perf: &PerformanceConfig,
) -> SectionOutput {
    SectionOutput {
        label,
        gross: PerformanceSummary::from_series(&report.gross, perf),
        net: PerformanceSummary::from_series(&report.net, perf),
        benchmark: benchmark.map(|b| PerformanceSummary::from_series(b, perf)),
        excess: benchmark
            .map(|b| PerformanceSummary::from_series(&excess_returns(&report.net, b), perf)),
        dropped_observations: report.dropped_observations,
        outside_universe: report.outside_universe,
        skipped: report.skipped.clone(),
    }
}

fn write_series(reports: &[SpreadReport], path: &std::path::Path) -> Result<()> {
    let mut frames = reports.iter().map(SpreadReport::to_dataframe);
    let Some(first) = frames.next() else {
        return Ok(());
    };

    let mut df = first?;
    for frame in frames {
        df.vstack_mut(&frame?)?;
    }
    data::write_csv(&mut df, path)?;
    Ok(())
}

fn print_text(panel: &std::path::Path, config: &EngineConfig, sections: &[SectionOutput]) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Long/Short Backtest                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Panel:          {}", panel.display());
    println!("Group fraction: {}", config.group_fraction);
    println!(
        "Cost model:     {} ({} per unit)",
        config.cost_model, config.cost_per_unit
    );
    if let Some(universe) = &config.universe {
        println!("Universe:       top {} by {}", universe.top_n, universe.column);
    }
    println!();

    for section in sections {
        println!("=== {} ===", section.label.to_uppercase());
        println!("-- gross --");
        println!("{}", section.gross);
        println!("-- net --");
        println!("{}", section.net);
        if let Some(bench) = &section.benchmark {
            println!("-- equal-weight benchmark --");
            println!("{bench}");
        }
        if let Some(excess) = &section.excess {
            println!("-- net minus benchmark --");
            println!("{excess}");
        }

        println!(
            "Dropped observations: {}, outside universe: {}, skipped dates: {}",
            section.dropped_observations,
            section.outside_universe,
            section.skipped.len()
        );
        for skip in section.skipped.iter().take(10) {
            println!("  {skip}");
        }
        if section.skipped.len() > 10 {
            println!("  ... and {} more", section.skipped.len() - 10);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almeria_costs::CostModelKind;
    use almeria_traits::{DailySpread, Date};
    use approx::assert_relative_eq;

    fn report(day: u32, gross: f64, net: f64) -> SpreadReport {
        let date = Date::from_ymd_opt(2024, 1, day).unwrap();
        SpreadReport {
            spreads: vec![DailySpread {
                date,
                long_return: gross,
                short_return: 0.0,
                gross_return: gross,
                long: vec!["A".to_string()],
                short: vec!["B".to_string()],
            }],
            gross: vec![DailyReturn::new(date, gross)],
            net: vec![DailyReturn::new(date, net)],
            skipped: Vec::new(),
            dropped_observations: 1,
            outside_universe: 0,
            cost_model: CostModelKind::FlatPerDay,
        }
    }

    #[test]
    fn test_summarize_with_benchmark() {
        let r = report(2, 0.02, 0.019);
        let bench = vec![DailyReturn::new(Date::from_ymd_opt(2024, 1, 2).unwrap(), 0.005)];

        let section = summarize("full sample".to_string(), &r, Some(bench.as_slice()), &Default::default());
        assert_relative_eq!(section.gross.mean, 0.02, epsilon = 1e-12);
        assert_relative_eq!(section.net.mean, 0.019, epsilon = 1e-12);
        assert_relative_eq!(section.excess.unwrap().mean, 0.014, epsilon = 1e-12);
        assert_eq!(section.dropped_observations, 1);
    }

    #[test]
    fn test_write_series_stacks_sections() {
        let path = std::env::temp_dir().join(format!("almeria-series-{}.csv", std::process::id()));
        write_series(&[report(2, 0.02, 0.019), report(3, 0.01, 0.009)], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().contains("net_return"));

        std::fs::remove_file(&path).ok();
    }
}

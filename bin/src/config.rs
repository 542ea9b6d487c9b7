//! Engine configuration from file, environment and flags.

use std::path::PathBuf;

use almeria_engine::{EngineConfig, UniverseFilter};
use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::debug;

/// Environment variable naming a default JSON config file.
const CONFIG_ENV: &str = "ALMERIA_CONFIG";

/// Flags shared by every command that runs the engine.
///
/// Values given here override the JSON config file, which overrides the
/// built-in defaults.
#[derive(Debug, Clone, Default, Args)]
pub(crate) struct EngineArgs {
    /// JSON engine config (defaults to $ALMERIA_CONFIG)
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Fraction of each date's universe per leg, in (0, 0.5]
    #[arg(short = 'f', long)]
    pub(crate) group_fraction: Option<f64>,

    /// Transaction cost per unit (0.0005 = 5 bps)
    #[arg(long)]
    pub(crate) cost_per_unit: Option<f64>,

    /// Cost model (flat_per_day or turnover_proportional)
    #[arg(long)]
    pub(crate) cost_model: Option<String>,

    /// Duplicate asset policy (skip or mean)
    #[arg(long)]
    pub(crate) duplicates: Option<String>,

    /// Minimum valid observations per date
    #[arg(long)]
    pub(crate) min_observations: Option<usize>,

    /// Date column name
    #[arg(long)]
    pub(crate) date_col: Option<String>,

    /// Asset column name
    #[arg(long)]
    pub(crate) asset_col: Option<String>,

    /// Score column name
    #[arg(long)]
    pub(crate) score_col: Option<String>,

    /// Forward return column name
    #[arg(long)]
    pub(crate) return_col: Option<String>,

    /// Column ranking each date's universe (e.g. volume)
    #[arg(long, requires = "universe_top")]
    pub(crate) universe_col: Option<String>,

    /// Assets kept per date by --universe-col
    #[arg(long, requires = "universe_col")]
    pub(crate) universe_top: Option<usize>,

    /// Exclude rows whose universe column is below this value
    #[arg(long)]
    pub(crate) universe_min: Option<f64>,

    /// Rank dates on a single thread
    #[arg(long)]
    pub(crate) sequential: bool,
}

impl EngineArgs {
    /// Build and validate the engine configuration.
    pub(crate) fn resolve(&self) -> Result<EngineConfig> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                debug!(path = %path.display(), "reading engine config");
                let json = std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read config {}", path.display()))?;
                EngineConfig::from_json(&json)?
            }
            None => EngineConfig::default(),
        };

        if let Some(f) = self.group_fraction {
            config.group_fraction = f;
        }
        if let Some(c) = self.cost_per_unit {
            config.cost_per_unit = c;
        }
        if let Some(model) = &self.cost_model {
            config.cost_model = model.parse()?;
        }
        if let Some(policy) = &self.duplicates {
            config.duplicate_policy = policy.parse()?;
        }
        if let Some(n) = self.min_observations {
            config.min_observations = n;
        }
        if let Some(name) = &self.date_col {
            config.columns.date = name.clone();
        }
        if let Some(name) = &self.asset_col {
            config.columns.asset = name.clone();
        }
        if let Some(name) = &self.score_col {
            config.columns.score = name.clone();
        }
        if let Some(name) = &self.return_col {
            config.columns.forward_return = name.clone();
        }
        match (&self.universe_col, self.universe_top) {
            (Some(column), Some(top_n)) => {
                config.universe = Some(UniverseFilter::top(column.clone(), top_n));
            }
            (None, None) => {}
            _ => bail!("--universe-col and --universe-top must be given together"),
        }
        if let Some(min) = self.universe_min {
            match config.universe.as_mut() {
                Some(universe) => universe.min_value = Some(min),
                None => bail!("--universe-min needs a universe (--universe-col and --universe-top)"),
            }
        }
        if self.sequential {
            config.parallel = false;
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almeria_costs::CostModelKind;
    use almeria_engine::DuplicatePolicy;

    #[test]
    fn test_flags_override_defaults() {
        let args = EngineArgs {
            group_fraction: Some(0.2),
            cost_per_unit: Some(0.0005),
            cost_model: Some("turnover".to_string()),
            duplicates: Some("mean".to_string()),
            score_col: Some("pred_signal".to_string()),
            sequential: true,
            config: Some(PathBuf::from("/dev/null/none")),
            ..Default::default()
        };
        // unreadable file is an error, not silently ignored
        assert!(args.resolve().is_err());

        let args = EngineArgs { config: None, ..args };
        let config = args.resolve().unwrap();
        assert_eq!(config.group_fraction, 0.2);
        assert_eq!(config.cost_per_unit, 0.0005);
        assert_eq!(config.cost_model, CostModelKind::TurnoverProportional);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Mean);
        assert_eq!(config.columns.score, "pred_signal");
        assert_eq!(config.columns.date, "date");
        assert!(!config.parallel);
    }

    #[test]
    fn test_file_then_flags() {
        let path = std::env::temp_dir().join(format!("almeria-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "group_fraction": 0.3, "cost_per_unit": 0.001 }"#).unwrap();

        let args = EngineArgs {
            config: Some(path.clone()),
            cost_per_unit: Some(0.0),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.group_fraction, 0.3);
        assert_eq!(config.cost_per_unit, 0.0);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_universe_flags() {
        let args = EngineArgs {
            universe_col: Some("volume".to_string()),
            universe_top: Some(25),
            universe_min: Some(1e5),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(
            config.universe,
            Some(UniverseFilter::top("volume", 25).with_min_value(1e5))
        );

        let args = EngineArgs {
            universe_min: Some(1e5),
            ..Default::default()
        };
        assert!(args.resolve().is_err());

        let args = EngineArgs {
            universe_col: Some("volume".to_string()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_invalid_override_rejected() {
        let args = EngineArgs {
            group_fraction: Some(0.75),
            ..Default::default()
        };
        assert!(args.resolve().is_err());

        let args = EngineArgs {
            cost_model: Some("quadratic".to_string()),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }
}

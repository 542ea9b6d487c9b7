//! Engine configuration.

use std::str::FromStr;

use almeria_costs::CostModelKind;
use almeria_traits::{AlmeriaError, ColumnMap, Result};
use serde::{Deserialize, Serialize};

use crate::universe::UniverseFilter;

/// Largest accepted `group_fraction`. Above this the long and short legs
/// would share assets.
pub const MAX_GROUP_FRACTION: f64 = 0.5;

/// What to do when an asset appears more than once on the same date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Skip the whole date and record a data-integrity warning.
    #[default]
    Skip,
    /// Collapse duplicates into one observation with mean score and return.
    Mean,
}

impl FromStr for DuplicatePolicy {
    type Err = AlmeriaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "mean" => Ok(Self::Mean),
            other => Err(AlmeriaError::Configuration(format!(
                "unknown duplicate_policy '{other}' (expected skip or mean)"
            ))),
        }
    }
}

/// Engine configuration.
///
/// Every field has a default, so a partial JSON document is a valid
/// configuration:
///
/// ```json
/// { "group_fraction": 0.2, "cost_per_unit": 0.0005, "cost_model": "turnover_proportional" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fraction of each date's universe in each leg, in (0, 0.5]
    pub group_fraction: f64,
    /// Cost per unit (0.0005 = 5 bps)
    pub cost_per_unit: f64,
    /// Cost model applied after the spread stage
    pub cost_model: CostModelKind,
    /// Column roles in the input panel
    pub columns: ColumnMap,
    /// Handling of duplicate asset ids within a date
    pub duplicate_policy: DuplicatePolicy,
    /// Minimum valid observations for a date to be ranked (at least 2)
    pub min_observations: usize,
    /// Restrict each date to the top assets by another column
    pub universe: Option<UniverseFilter>,
    /// Rank dates on the rayon thread pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            group_fraction: 0.1,
            cost_per_unit: 0.0,
            cost_model: CostModelKind::FlatPerDay,
            columns: ColumnMap::default(),
            duplicate_policy: DuplicatePolicy::Skip,
            min_observations: 2,
            universe: None,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Malformed JSON, an unknown cost model name or an invalid value are all
    /// reported as [`AlmeriaError::Configuration`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AlmeriaError::Configuration(format!("invalid engine config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if !(self.group_fraction > 0.0 && self.group_fraction <= MAX_GROUP_FRACTION) {
            return Err(AlmeriaError::Configuration(format!(
                "group_fraction must be in (0, {MAX_GROUP_FRACTION}], got {}",
                self.group_fraction
            )));
        }

        if !self.cost_per_unit.is_finite() || self.cost_per_unit < 0.0 {
            return Err(AlmeriaError::Configuration(format!(
                "cost_per_unit must be a non-negative number, got {}",
                self.cost_per_unit
            )));
        }

        if self.min_observations < 2 {
            return Err(AlmeriaError::Configuration(format!(
                "min_observations must be at least 2, got {}",
                self.min_observations
            )));
        }

        if let Some(universe) = &self.universe {
            universe.validate(self.min_observations)?;
        }

        for (role, name) in self.columns.roles() {
            if name.trim().is_empty() {
                return Err(AlmeriaError::Configuration(format!(
                    "column mapping for the {role} role is empty"
                )));
            }
        }

        Ok(())
    }
}

//! Core trait definition for cost models.

use std::str::FromStr;

use almeria_traits::{AlmeriaError, DailyReturn, DailySpread};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{FlatPerDay, TurnoverProportional};

/// Deducts an estimated trading cost from each day of a spread series.
///
/// Implementations receive the full, date-ordered spread series because a
/// model may need the previous date's positions. All implementations must be
/// thread-safe (Send + Sync).
///
/// # Examples
///
/// ```rust,no_run
/// use almeria_costs::CostModel;
/// use almeria_traits::DailySpread;
///
/// struct Free;
///
/// impl CostModel for Free {
///     fn costs(&self, spreads: &[DailySpread]) -> Vec<f64> {
///         vec![0.0; spreads.len()]
///     }
///
///     fn name(&self) -> &str {
///         "free"
///     }
/// }
/// ```
pub trait CostModel: Send + Sync {
    /// Cost to deduct on each date, aligned with `spreads`.
    ///
    /// `spreads` must be sorted by date.
    fn costs(&self, spreads: &[DailySpread]) -> Vec<f64>;

    /// Name of this cost model.
    fn name(&self) -> &str;

    /// Net return series: each gross spread minus its cost.
    fn apply(&self, spreads: &[DailySpread]) -> Vec<DailyReturn> {
        spreads
            .iter()
            .zip(self.costs(spreads))
            .map(|(spread, cost)| DailyReturn::new(spread.date, spread.gross_return - cost))
            .collect()
    }
}

/// Selector for the built-in cost models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModelKind {
    /// Constant cost every day, regardless of turnover.
    #[default]
    #[display("flat_per_day")]
    #[serde(alias = "flat")]
    FlatPerDay,
    /// Cost proportional to the sum of absolute weight changes.
    #[display("turnover_proportional")]
    #[serde(alias = "turnover")]
    TurnoverProportional,
}

impl CostModelKind {
    /// Instantiate the selected model.
    pub fn build(self, cost_per_unit: f64) -> Box<dyn CostModel> {
        match self {
            Self::FlatPerDay => Box::new(FlatPerDay::new(cost_per_unit)),
            Self::TurnoverProportional => Box::new(TurnoverProportional::new(cost_per_unit)),
        }
    }

    /// Whether the model carries positions from one date to the next.
    pub const fn is_path_dependent(self) -> bool {
        matches!(self, Self::TurnoverProportional)
    }
}

impl FromStr for CostModelKind {
    type Err = AlmeriaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "flat_per_day" | "flat" => Ok(Self::FlatPerDay),
            "turnover_proportional" | "turnover" => Ok(Self::TurnoverProportional),
            other => Err(AlmeriaError::Configuration(format!(
                "unknown cost_model '{other}' (expected flat_per_day or turnover_proportional)"
            ))),
        }
    }
}

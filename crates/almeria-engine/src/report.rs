//! Engine output.

use almeria_costs::CostModelKind;
use almeria_traits::{DailyReturn, DailySpread, Date, Result, SkippedDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Everything one engine run produces.
///
/// `spreads`, `gross` and `net` are aligned and sorted by date. Dates that
/// produced no return are listed in `skipped` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadReport {
    /// Per-date leg returns and memberships
    pub spreads: Vec<DailySpread>,
    /// Long-minus-short return before costs
    pub gross: Vec<DailyReturn>,
    /// Return after the cost model
    pub net: Vec<DailyReturn>,
    /// Dates excluded from the series, with reasons
    pub skipped: Vec<SkippedDate>,
    /// Rows dropped for an undefined score or forward return
    pub dropped_observations: usize,
    /// Rows outside their date's universe
    #[serde(default)]
    pub outside_universe: usize,
    /// Cost model used for `net`
    pub cost_model: CostModelKind,
}

impl SpreadReport {
    /// Number of dates with a return.
    pub fn len(&self) -> usize {
        self.spreads.len()
    }

    /// Whether no date produced a return.
    pub fn is_empty(&self) -> bool {
        self.spreads.is_empty()
    }

    /// Dates with a return, ascending.
    pub fn dates(&self) -> Vec<Date> {
        self.spreads.iter().map(|s| s.date).collect()
    }

    /// Gross return values, aligned with [`Self::dates`].
    pub fn gross_values(&self) -> Vec<f64> {
        self.gross.iter().map(|r| r.value).collect()
    }

    /// Net return values, aligned with [`Self::dates`].
    pub fn net_values(&self) -> Vec<f64> {
        self.net.iter().map(|r| r.value).collect()
    }

    /// Render the daily series as a DataFrame with columns `date`,
    /// `long_return`, `short_return`, `gross_return`, `net_return`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let long: Vec<f64> = self.spreads.iter().map(|s| s.long_return).collect();
        let short: Vec<f64> = self.spreads.iter().map(|s| s.short_return).collect();

        let df = df! {
            "date" => self.dates(),
            "long_return" => long,
            "short_return" => short,
            "gross_return" => self.gross_values(),
            "net_return" => self.net_values(),
        }?;

        Ok(df)
    }
}

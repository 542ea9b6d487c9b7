//! Turnover-proportional cost model.
//!
//! Each day's cost is `cost_per_unit` times the sum of absolute position
//! weight changes against the previous rebalancing date. Long members carry
//! weight `+1/|long|`, short members `-1/|short|`, everything else zero. Only
//! one snapshot of weights is kept while walking the series.

use std::collections::BTreeMap;

use almeria_traits::{AssetId, DailySpread};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cost_model::CostModel;

/// Position weights keyed by asset. Assets absent from the map hold zero.
pub type PositionWeights = BTreeMap<AssetId, f64>;

/// Equal-weighted long/short positions implied by one day's legs.
pub fn position_weights(spread: &DailySpread) -> PositionWeights {
    let mut weights = PositionWeights::new();

    if !spread.long.is_empty() {
        let w = 1.0 / spread.long.len() as f64;
        for asset in &spread.long {
            weights.insert(asset.clone(), w);
        }
    }
    if !spread.short.is_empty() {
        let w = -1.0 / spread.short.len() as f64;
        for asset in &spread.short {
            weights.insert(asset.clone(), w);
        }
    }

    weights
}

/// Sum of absolute weight changes over the union of assets held on either
/// side. This is two-way turnover: fully replacing a 100% gross book costs 2.
pub fn turnover(previous: &PositionWeights, next: &PositionWeights) -> f64 {
    let changed: f64 = next
        .iter()
        .map(|(asset, &w)| (w - previous.get(asset).copied().unwrap_or(0.0)).abs())
        .sum();
    let closed: f64 = previous
        .iter()
        .filter(|(asset, _)| !next.contains_key(*asset))
        .map(|(_, w)| w.abs())
        .sum();

    changed + closed
}

/// Charges `cost_per_unit` per unit of turnover.
///
/// The first date trades in from a flat book. A date missing from the
/// series (skipped by the engine) is not a rebalancing date, so positions
/// carry across it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnoverProportional {
    cost_per_unit: f64,
}

impl TurnoverProportional {
    /// Create a turnover model charging `cost_per_unit` per unit traded.
    pub const fn new(cost_per_unit: f64) -> Self {
        Self { cost_per_unit }
    }

    /// The charge per unit of turnover.
    pub const fn cost_per_unit(&self) -> f64 {
        self.cost_per_unit
    }

    /// Turnover on each date, aligned with `spreads`.
    pub fn turnover_series(&self, spreads: &[DailySpread]) -> Vec<f64> {
        let mut previous = PositionWeights::new();

        spreads
            .iter()
            .map(|spread| {
                let next = position_weights(spread);
                let t = turnover(&previous, &next);
                previous = next;
                t
            })
            .collect()
    }
}

impl CostModel for TurnoverProportional {
    fn costs(&self, spreads: &[DailySpread]) -> Vec<f64> {
        let series = self.turnover_series(spreads);
        if !series.is_empty() {
            let mean = series.iter().sum::<f64>() / series.len() as f64;
            debug!(days = series.len(), mean_turnover = mean, "computed turnover");
        }

        series
            .into_iter()
            .map(|t| t * self.cost_per_unit)
            .collect()
    }

    fn name(&self) -> &str {
        "turnover_proportional"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almeria_traits::Date;
    use approx::assert_relative_eq;

    fn spread(day: u32, long: &[&str], short: &[&str]) -> DailySpread {
        DailySpread {
            date: Date::from_ymd_opt(2024, 1, day).unwrap(),
            long_return: 0.02,
            short_return: 0.01,
            gross_return: 0.01,
            long: long.iter().map(|s| s.to_string()).collect(),
            short: short.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_position_weights() {
        let weights = position_weights(&spread(2, &["A", "B"], &["Y", "Z"]));
        assert_eq!(weights.len(), 4);
        assert_relative_eq!(weights["A"], 0.5);
        assert_relative_eq!(weights["Z"], -0.5);
        assert_relative_eq!(weights.values().sum::<f64>(), 0.0);
    }

    #[test]
    fn test_turnover_from_flat_book_is_gross_exposure() {
        let next = position_weights(&spread(2, &["A"], &["Z"]));
        assert_relative_eq!(turnover(&PositionWeights::new(), &next), 2.0);
    }

    #[test]
    fn test_turnover_unchanged_book_is_zero() {
        let w = position_weights(&spread(2, &["A"], &["Z"]));
        assert_relative_eq!(turnover(&w, &w), 0.0);
    }

    #[test]
    fn test_turnover_counts_closed_and_flipped_positions() {
        let old = position_weights(&spread(2, &["A"], &["Z"]));
        // A closed (1), Z flipped from -1 to +1 (2), Y opened short (1)
        let new = position_weights(&spread(3, &["Z"], &["Y"]));
        assert_relative_eq!(turnover(&old, &new), 4.0);
    }

    #[test]
    fn test_turnover_costs_track_rebalances() {
        let model = TurnoverProportional::new(0.001);
        let spreads = [
            spread(2, &["A"], &["Z"]),
            spread(3, &["A"], &["Z"]),
            spread(4, &["B"], &["Z"]),
        ];

        let costs = model.costs(&spreads);
        assert_relative_eq!(costs[0], 0.002, epsilon = 1e-12);
        assert_relative_eq!(costs[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(costs[2], 0.002, epsilon = 1e-12);

        let net = model.apply(&spreads);
        assert_relative_eq!(net[0].value, 0.008, epsilon = 1e-12);
        assert_relative_eq!(net[1].value, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_cost_per_unit_is_identity() {
        let spreads = [spread(2, &["A"], &["Z"]), spread(3, &["B"], &["Y"])];
        let net = TurnoverProportional::new(0.0).apply(&spreads);
        assert_eq!(net[0].value, spreads[0].gross_return);
        assert_eq!(net[1].value, spreads[1].gross_return);
    }
}

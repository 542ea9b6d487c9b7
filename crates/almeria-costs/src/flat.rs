//! Flat per-day cost model.

use almeria_traits::DailySpread;
use serde::{Deserialize, Serialize};

use crate::cost_model::CostModel;

/// Subtracts the same cost from every day, regardless of how much the
/// portfolio traded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatPerDay {
    cost_per_unit: f64,
}

impl FlatPerDay {
    /// Create a flat model charging `cost_per_unit` per day (0.0005 = 5 bps).
    pub const fn new(cost_per_unit: f64) -> Self {
        Self { cost_per_unit }
    }

    /// The per-day charge.
    pub const fn cost_per_unit(&self) -> f64 {
        self.cost_per_unit
    }
}

impl CostModel for FlatPerDay {
    fn costs(&self, spreads: &[DailySpread]) -> Vec<f64> {
        vec![self.cost_per_unit; spreads.len()]
    }

    fn name(&self) -> &str {
        "flat_per_day"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use almeria_traits::Date;
    use approx::assert_relative_eq;

    fn spread(day: u32, gross: f64) -> DailySpread {
        DailySpread {
            date: Date::from_ymd_opt(2024, 1, day).unwrap(),
            long_return: gross,
            short_return: 0.0,
            gross_return: gross,
            long: vec!["A".to_string()],
            short: vec!["B".to_string()],
        }
    }

    #[test]
    fn test_flat_subtracts_constant() {
        let model = FlatPerDay::new(0.0005);
        let net = model.apply(&[spread(2, 0.01), spread(3, -0.02)]);

        assert_eq!(net.len(), 2);
        assert_relative_eq!(net[0].value, 0.0095, epsilon = 1e-12);
        assert_relative_eq!(net[1].value, -0.0205, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_cost_is_identity() {
        let spreads = [spread(2, 0.01), spread(3, -0.02), spread(4, 0.0)];
        let net = FlatPerDay::new(0.0).apply(&spreads);

        for (n, s) in net.iter().zip(&spreads) {
            assert_eq!(n.date, s.date);
            assert_eq!(n.value, s.gross_return);
        }
    }
}

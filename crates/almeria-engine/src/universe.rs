//! Per-date investable universe.
//!
//! A universe keeps, on each date, the assets ranked highest by a
//! separate column such as traded volume. Membership is decided over every
//! row of the date that has a value in that column, before scores or
//! forward returns are looked at.

use std::collections::BTreeMap;

use almeria_traits::{AlmeriaError, Date, Observation, Result};
use serde::{Deserialize, Serialize};

/// Top-N selection by a ranking column.
///
/// ```json
/// { "column": "volume", "top_n": 25, "min_value": 100000.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseFilter {
    /// Column ranked to select the universe, largest first
    pub column: String,
    /// Assets kept per date
    pub top_n: usize,
    /// Rows below this value never enter the universe
    #[serde(default)]
    pub min_value: Option<f64>,
}

impl UniverseFilter {
    /// Keep the `top_n` assets with the largest `column` on each date.
    pub fn top(column: impl Into<String>, top_n: usize) -> Self {
        Self {
            column: column.into(),
            top_n,
            min_value: None,
        }
    }

    /// Also exclude rows whose `column` is below `min_value`.
    #[must_use]
    pub const fn with_min_value(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    /// Check the filter against the engine's per-date minimum.
    pub fn validate(&self, min_observations: usize) -> Result<()> {
        if self.column.trim().is_empty() {
            return Err(AlmeriaError::Configuration(
                "universe column is empty".to_string(),
            ));
        }

        if self.top_n < min_observations {
            return Err(AlmeriaError::Configuration(format!(
                "universe top_n must be at least min_observations ({min_observations}), got {}",
                self.top_n
            )));
        }

        if let Some(min) = self.min_value {
            if !min.is_finite() {
                return Err(AlmeriaError::Configuration(format!(
                    "universe min_value must be finite, got {min}"
                )));
            }
        }

        Ok(())
    }

    /// Flag the rows that belong to their date's universe.
    ///
    /// `keys` holds the ranking column, aligned with `observations`. Rows
    /// without a key, or below `min_value`, are never members. Equal keys
    /// are ordered by asset id so that membership does not depend on row
    /// order.
    pub fn members(&self, observations: &[Observation], keys: &[Option<f64>]) -> Vec<bool> {
        let mut by_date: BTreeMap<Date, Vec<(usize, f64)>> = BTreeMap::new();
        for (i, obs) in observations.iter().enumerate() {
            let Some(key) = keys.get(i).copied().flatten() else {
                continue;
            };
            if self.min_value.is_some_and(|min| key < min) {
                continue;
            }
            by_date.entry(obs.date).or_default().push((i, key));
        }

        let mut members = vec![false; observations.len()];
        for mut rows in by_date.into_values() {
            rows.sort_by(|(a, ka), (b, kb)| {
                kb.total_cmp(ka)
                    .then_with(|| observations[*a].asset_id.cmp(&observations[*b].asset_id))
            });
            for (i, _) in rows.into_iter().take(self.top_n) {
                members[i] = true;
            }
        }
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(d: u32, asset: &str) -> Observation {
        Observation {
            date: Date::from_ymd_opt(2024, 1, d).unwrap(),
            asset_id: asset.to_string(),
            score: Some(1.0),
            forward_return: Some(0.01),
        }
    }

    #[test]
    fn test_members_take_largest_per_date() {
        let observations = vec![
            obs(2, "A"),
            obs(2, "B"),
            obs(2, "C"),
            obs(3, "A"),
            obs(3, "B"),
            obs(3, "C"),
        ];
        let keys = vec![
            Some(300.0),
            Some(100.0),
            Some(200.0),
            Some(10.0),
            Some(30.0),
            Some(20.0),
        ];

        let members = UniverseFilter::top("volume", 2).members(&observations, &keys);
        assert_eq!(members, vec![true, false, true, false, true, true]);
    }

    #[test]
    fn test_members_skip_missing_and_small_keys() {
        let observations = vec![obs(2, "A"), obs(2, "B"), obs(2, "C"), obs(2, "D")];
        let keys = vec![None, Some(50.0), Some(500.0), Some(5_000.0)];

        let universe = UniverseFilter::top("volume", 3).with_min_value(100.0);
        let members = universe.members(&observations, &keys);
        assert_eq!(members, vec![false, false, true, true]);
    }

    #[test]
    fn test_members_ties_ordered_by_asset() {
        let observations = vec![obs(2, "C"), obs(2, "A"), obs(2, "B")];
        let keys = vec![Some(1.0), Some(1.0), Some(1.0)];

        let members = UniverseFilter::top("volume", 2).members(&observations, &keys);
        assert_eq!(members, vec![false, true, true]);
    }

    #[test]
    fn test_validate() {
        assert!(UniverseFilter::top("volume", 25).validate(2).is_ok());
        assert!(UniverseFilter::top("", 25).validate(2).unwrap_err().is_configuration());
        assert!(UniverseFilter::top("volume", 1).validate(2).is_err());
        assert!(
            UniverseFilter::top("volume", 25)
                .with_min_value(f64::NAN)
                .validate(2)
                .is_err()
        );
    }
}

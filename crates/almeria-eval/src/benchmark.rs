//! Equal-weight universe benchmark.

use std::collections::BTreeMap;

use almeria_traits::{DailyReturn, Date, Observation};

/// Mean forward return of every asset on each date.
///
/// Unlike the spread legs, the benchmark does not need a score: any row
/// with a defined forward return counts. Dates without one are omitted.
pub fn equal_weight_benchmark(observations: &[Observation]) -> Vec<DailyReturn> {
    let mut sums: BTreeMap<Date, (f64, usize)> = BTreeMap::new();
    for obs in observations {
        if let Some(r) = obs.forward_return {
            let entry = sums.entry(obs.date).or_insert((0.0, 0));
            entry.0 += r;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(date, (sum, n))| DailyReturn::new(date, sum / n as f64))
        .collect()
}

/// Strategy minus benchmark on the dates both series cover.
pub fn excess_returns(strategy: &[DailyReturn], benchmark: &[DailyReturn]) -> Vec<DailyReturn> {
    let bench: BTreeMap<Date, f64> = benchmark.iter().map(|r| (r.date, r.value)).collect();

    strategy
        .iter()
        .filter_map(|r| {
            bench
                .get(&r.date)
                .map(|b| DailyReturn::new(r.date, r.value - b))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(d: u32) -> Date {
        Date::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn obs(d: u32, asset: &str, score: Option<f64>, ret: Option<f64>) -> Observation {
        Observation {
            date: day(d),
            asset_id: asset.to_string(),
            score,
            forward_return: ret,
        }
    }

    #[test]
    fn test_equal_weight_benchmark() {
        let observations = vec![
            obs(3, "A", Some(1.0), Some(0.02)),
            obs(2, "A", Some(1.0), Some(0.01)),
            obs(2, "B", None, Some(0.03)),
            obs(2, "C", Some(0.5), None),
            obs(4, "A", Some(1.0), None),
        ];

        let bench = equal_weight_benchmark(&observations);
        assert_eq!(bench.len(), 2);
        assert_eq!(bench[0].date, day(2));
        assert_relative_eq!(bench[0].value, 0.02, epsilon = 1e-12);
        assert_eq!(bench[1].date, day(3));
        assert_relative_eq!(bench[1].value, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_excess_returns_aligns_dates() {
        let strategy = vec![DailyReturn::new(day(2), 0.03), DailyReturn::new(day(3), 0.01)];
        let benchmark = vec![DailyReturn::new(day(3), 0.02), DailyReturn::new(day(4), 0.0)];

        let excess = excess_returns(&strategy, &benchmark);
        assert_eq!(excess.len(), 1);
        assert_eq!(excess[0].date, day(3));
        assert_relative_eq!(excess[0].value, -0.01, epsilon = 1e-12);
    }
}

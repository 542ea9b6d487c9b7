//! Performance statistics of a daily return series.

use std::fmt;

use almeria_traits::DailyReturn;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Configuration for performance summaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Number of trading days per year for annualization
    pub trading_days_per_year: usize,
    /// Starting value of the compounded equity curve
    pub initial_capital: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252,
            initial_capital: 1_000.0,
        }
    }
}

/// Summary statistics of a daily return series.
///
/// Undefined statistics (e.g. Sharpe of a constant series) are NaN rather
/// than zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Number of daily returns
    pub n_days: usize,
    /// Mean daily return
    pub mean: f64,
    /// Sample standard deviation of daily returns
    pub std: f64,
    /// Annualized Sharpe ratio, `mean / std * sqrt(days per year)`
    pub sharpe: f64,
    /// Share of days with a strictly positive return
    pub hit_rate: f64,
    /// Largest peak-to-trough decline of the compounded curve, as a positive
    /// fraction
    pub max_drawdown: f64,
    /// Compounded return over the whole series
    pub total_return: f64,
    /// `initial_capital` grown by `total_return`
    pub ending_value: f64,
}

impl PerformanceSummary {
    /// Summarize raw daily returns. Non-finite values are ignored.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use almeria_eval::{PerformanceConfig, PerformanceSummary};
    ///
    /// let summary = PerformanceSummary::calculate(&[0.01, -0.005, 0.002], &PerformanceConfig::default());
    /// assert_eq!(summary.n_days, 3);
    /// ```
    pub fn calculate(returns: &[f64], config: &PerformanceConfig) -> Self {
        let valid: Array1<f64> = returns.iter().copied().filter(|x| x.is_finite()).collect();
        let n_days = valid.len();

        let mean = valid.mean().unwrap_or(f64::NAN);
        let std = if n_days < 2 { f64::NAN } else { valid.std(1.0) };
        let sharpe = if std.is_finite() && std > 0.0 {
            mean / std * (config.trading_days_per_year as f64).sqrt()
        } else {
            f64::NAN
        };
        let hit_rate = if n_days == 0 {
            f64::NAN
        } else {
            valid.iter().filter(|&&r| r > 0.0).count() as f64 / n_days as f64
        };

        let cumulative = cumulative_returns(valid.as_slice().unwrap_or(&[]));
        let total_return = cumulative.last().copied().unwrap_or(0.0);

        Self {
            n_days,
            mean,
            std,
            sharpe,
            hit_rate,
            max_drawdown: max_drawdown(&cumulative),
            total_return,
            ending_value: config.initial_capital * (1.0 + total_return),
        }
    }

    /// Summarize a dated series such as [`SpreadReport::net`].
    ///
    /// [`SpreadReport::net`]: almeria_engine::SpreadReport::net
    pub fn from_series(series: &[DailyReturn], config: &PerformanceConfig) -> Self {
        let values: Vec<f64> = series.iter().map(|r| r.value).collect();
        Self::calculate(&values, config)
    }
}

impl fmt::Display for PerformanceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Days:              {}", self.n_days)?;
        writeln!(f, "Mean daily return: {:+.4}%", self.mean * 100.0)?;
        writeln!(f, "Daily volatility:  {:.4}%", self.std * 100.0)?;
        writeln!(f, "Annualized Sharpe: {:.2}", self.sharpe)?;
        writeln!(f, "Hit rate:          {:.1}%", self.hit_rate * 100.0)?;
        writeln!(f, "Max drawdown:      {:.2}%", self.max_drawdown * 100.0)?;
        writeln!(f, "Total return:      {:+.2}%", self.total_return * 100.0)?;
        write!(f, "Ending value:      {:.2}", self.ending_value)
    }
}

/// Compounded cumulative returns, `prod(1 + r) - 1` at each step.
fn cumulative_returns(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(0.0, |cum, &r| {
            *cum = (1.0 + *cum) * (1.0 + r) - 1.0;
            Some(*cum)
        })
        .collect()
}

/// Maximum drawdown of a cumulative return curve, as a positive fraction of
/// the running peak. The curve is taken to start at zero.
pub fn max_drawdown(cumulative_returns: &[f64]) -> f64 {
    let mut max_dd = 0.0;
    let mut peak = 0.0;

    for &cum_ret in cumulative_returns {
        if cum_ret > peak {
            peak = cum_ret;
        }
        let dd = (peak - cum_ret) / (1.0 + peak);
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_basic_statistics() {
        let s = PerformanceSummary::calculate(&[0.01, -0.02, 0.03, 0.0], &Default::default());

        assert_eq!(s.n_days, 4);
        assert_relative_eq!(s.mean, 0.005, epsilon = 1e-12);
        // sample variance: (0.005² + 0.025² + 0.025² + 0.005²) / 3
        assert_relative_eq!(s.std, (0.0013_f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(s.hit_rate, 0.5, epsilon = 1e-12);
        assert_relative_eq!(s.sharpe, s.mean / s.std * 252f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_compounding() {
        let s = PerformanceSummary::calculate(&[0.10, -0.10], &Default::default());
        assert_relative_eq!(s.total_return, -0.01, epsilon = 1e-12);
        assert_relative_eq!(s.ending_value, 990.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_drawdown() {
        // equity: 1.1, 0.88, 0.968
        let s = PerformanceSummary::calculate(&[0.10, -0.20, 0.10], &Default::default());
        assert_relative_eq!(s.max_drawdown, 0.2, epsilon = 1e-12);

        let rising = PerformanceSummary::calculate(&[0.01, 0.02], &Default::default());
        assert_eq!(rising.max_drawdown, 0.0);
    }

    #[test]
    fn test_drawdown_from_start() {
        assert_relative_eq!(max_drawdown(&[-0.05, -0.10]), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_series_has_no_sharpe() {
        let s = PerformanceSummary::calculate(&[0.01, 0.01, 0.01], &Default::default());
        assert_eq!(s.std, 0.0);
        assert!(s.sharpe.is_nan());
    }

    #[test]
    fn test_short_series() {
        let one = PerformanceSummary::calculate(&[0.02], &Default::default());
        assert!(one.std.is_nan());
        assert!(one.sharpe.is_nan());
        assert_eq!(one.hit_rate, 1.0);

        let empty = PerformanceSummary::calculate(&[], &Default::default());
        assert_eq!(empty.n_days, 0);
        assert!(empty.mean.is_nan());
        assert_eq!(empty.ending_value, 1_000.0);
    }

    #[test]
    fn test_non_finite_ignored() {
        let s = PerformanceSummary::calculate(&[0.01, f64::NAN, 0.03], &Default::default());
        assert_eq!(s.n_days, 2);
        assert_relative_eq!(s.mean, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_from_series() {
        let d = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let series = [DailyReturn::new(d, 0.01), DailyReturn::new(d, 0.03)];
        let s = PerformanceSummary::from_series(&series, &PerformanceConfig::default());
        assert_relative_eq!(s.mean, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        let s = PerformanceSummary::calculate(&[0.01, -0.01], &Default::default());
        let text = s.to_string();
        assert!(text.contains("Annualized Sharpe"));
        assert!(text.contains("Ending value"));
    }
}

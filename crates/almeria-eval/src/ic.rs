//! Information Coefficient (IC) calculations.
//!
//! IC is the Spearman rank correlation between scores and forward returns on
//! one date. Its time series tells whether the ranking carries information
//! independently of how the legs are cut.

use almeria_engine::CrossSection;
use almeria_traits::Date;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Calculate the IC between signal scores and forward returns.
///
/// Pairs with a non-finite member are ignored. Returns NaN when the inputs
/// differ in length, when fewer than two pairs remain, or when either side
/// is constant.
///
/// # Example
///
/// ```rust,ignore
/// use ndarray::array;
/// use almeria_eval::calculate_ic;
///
/// let scores = array![1.5, 0.3, -0.8, 2.1];
/// let returns = array![0.02, 0.01, -0.01, 0.03];
/// let ic = calculate_ic(&scores, &returns);
/// ```
pub fn calculate_ic(scores: &Array1<f64>, forward_returns: &Array1<f64>) -> f64 {
    if scores.len() != forward_returns.len() {
        return f64::NAN;
    }

    let (s, r): (Vec<f64>, Vec<f64>) = scores
        .iter()
        .zip(forward_returns.iter())
        .filter(|(s, r)| s.is_finite() && r.is_finite())
        .map(|(&s, &r)| (s, r))
        .unzip();

    if s.len() < 2 {
        return f64::NAN;
    }

    pearson(&compute_ranks(&s), &compute_ranks(&r))
}

/// IC of one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyIc {
    /// Date of the cross-section
    pub date: Date,
    /// Spearman correlation of score and forward return
    pub ic: f64,
    /// Number of assets in the cross-section
    pub n_assets: usize,
}

/// IC per date over filtered cross-sections.
///
/// Every section yields an entry, NaN where the IC is undefined, so the
/// series stays aligned with the dates of the panel.
pub fn ic_series(sections: &[CrossSection]) -> Vec<DailyIc> {
    sections
        .iter()
        .map(|section| {
            let scores: Array1<f64> = section.candidates.iter().map(|c| c.score).collect();
            let returns: Array1<f64> =
                section.candidates.iter().map(|c| c.forward_return).collect();
            DailyIc {
                date: section.date,
                ic: calculate_ic(&scores, &returns),
                n_assets: section.candidates.len(),
            }
        })
        .collect()
}

/// Summary of an IC time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IcSummary {
    /// Mean IC
    pub mean_ic: f64,
    /// Sample standard deviation of IC
    pub std_ic: f64,
    /// Information Ratio, `mean_ic / std_ic`
    pub ir: f64,
    /// Share of dates with a positive IC
    pub hit_rate: f64,
    /// Number of dates with a defined IC
    pub n_obs: usize,
}

impl IcSummary {
    /// Summarize an IC series, ignoring undefined entries.
    ///
    /// All statistics are NaN when fewer than `min_observations` dates have a
    /// defined IC.
    pub fn calculate(series: &[DailyIc], min_observations: usize) -> Self {
        let valid: Array1<f64> = series
            .iter()
            .map(|d| d.ic)
            .filter(|x| x.is_finite())
            .collect();
        let n_obs = valid.len();

        if n_obs < min_observations.max(2) {
            return Self {
                mean_ic: f64::NAN,
                std_ic: f64::NAN,
                ir: f64::NAN,
                hit_rate: f64::NAN,
                n_obs,
            };
        }

        let mean_ic = valid.mean().unwrap_or(f64::NAN);
        let std_ic = valid.std(1.0);
        let ir = if std_ic > 0.0 { mean_ic / std_ic } else { f64::NAN };
        let hit_rate = valid.iter().filter(|&&ic| ic > 0.0).count() as f64 / n_obs as f64;

        Self {
            mean_ic,
            std_ic,
            ir,
            hit_rate,
            n_obs,
        }
    }
}

/// Zero-based ranks, ties sharing their average rank.
fn compute_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i;
        while j < n && indexed[j].1 == indexed[i].1 {
            j += 1;
        }

        let avg_rank = (i + j - 1) as f64 / 2.0;
        for (idx, _) in &indexed[i..j] {
            ranks[*idx] = avg_rank;
        }

        i = j;
    }

    ranks
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let x = Array1::from(x.to_vec());
    let y = Array1::from(y.to_vec());

    let (Some(mean_x), Some(mean_y)) = (x.mean(), y.mean()) else {
        return f64::NAN;
    };
    let dx = &x - mean_x;
    let dy = &y - mean_y;

    let var_x = dx.dot(&dx);
    let var_y = dy.dot(&dy);
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }

    dx.dot(&dy) / (var_x.sqrt() * var_y.sqrt())
}

//! Cross-sectional ranking and leg selection.

use std::cmp::Ordering;

use almeria_traits::SkipReason;

use crate::filter::Candidate;

/// Relative tolerance on `n * group_fraction` before rounding up.
///
/// Products such as `30 * 0.1` land a few ulps above an integer
/// (`3.0000000000000004`) and must not round up to the next one. Anything
/// further than `4 * f64::EPSILON * n * group_fraction` from an integer is a
/// genuine fraction, so `10 * 0.1000000001` still rounds up to 2.
const SIZE_TOLERANCE: f64 = 4.0 * f64::EPSILON;

/// Members per leg for a universe of `n` assets.
///
/// Returns `ceil(n * group_fraction)` clipped to `n / 2`, for every
/// fraction. The clip applies whenever `2 * ceil(n * group_fraction) > n`:
/// at `group_fraction = 0.5` with an odd `n`, and also on small universes
/// at lower fractions (`n = 3, f = 0.4` gives 1, `n = 5, f = 0.45` gives 2).
/// Assets left in the middle belong to neither leg, so the legs never share
/// an asset.
pub fn group_size(n: usize, group_fraction: f64) -> usize {
    let product = n as f64 * group_fraction;
    let raw = (product - product.abs() * SIZE_TOLERANCE).ceil().max(0.0) as usize;
    raw.min(n / 2)
}

/// The two legs of a date, borrowed from its cross-section.
#[derive(Debug, Clone, PartialEq)]
pub struct Legs<'a> {
    /// Highest-scored assets, best first.
    pub long: Vec<&'a Candidate>,
    /// Lowest-scored assets, in rank order (worst last).
    pub short: Vec<&'a Candidate>,
}

/// Ranks a date's candidates and carves out the long and short legs.
#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    group_fraction: f64,
    min_observations: usize,
}

impl Ranker {
    /// Create a ranker. The engine validates both arguments beforehand.
    pub const fn new(group_fraction: f64, min_observations: usize) -> Self {
        Self {
            group_fraction,
            min_observations,
        }
    }

    /// Order candidates by score descending, then asset id ascending.
    pub fn order<'a>(&self, candidates: &'a [Candidate]) -> Vec<&'a Candidate> {
        let mut ranked: Vec<&Candidate> = candidates.iter().collect();
        ranked.sort_by(|a, b| compare(a, b));
        ranked
    }

    /// Select the long and short legs.
    ///
    /// # Errors
    ///
    /// Returns [`SkipReason::InsufficientData`] when there are fewer than
    /// `min_observations` candidates or the legs would be empty.
    pub fn select<'a>(&self, candidates: &'a [Candidate]) -> Result<Legs<'a>, SkipReason> {
        let n = candidates.len();
        let k = group_size(n, self.group_fraction);

        if n < self.min_observations || k == 0 {
            return Err(SkipReason::InsufficientData {
                available: n,
                required: self.min_observations,
            });
        }

        let ranked = self.order(candidates);
        Ok(Legs {
            long: ranked[..k].to_vec(),
            short: ranked[n - k..].to_vec(),
        })
    }
}

fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.asset_id.cmp(&b.asset_id))
}

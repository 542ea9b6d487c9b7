//! Daily long-minus-short spread.

use almeria_traits::{DailySpread, Date};

use crate::legs::leg_return;
use crate::rank::Legs;

/// Combine a date's legs into its gross spread.
///
/// Returns `None` unless both legs are non-empty.
pub fn daily_spread(date: Date, legs: &Legs<'_>) -> Option<DailySpread> {
    let long_return = leg_return(&legs.long)?;
    let short_return = leg_return(&legs.short)?;

    Some(DailySpread {
        date,
        long_return,
        short_return,
        gross_return: long_return - short_return,
        long: legs.long.iter().map(|c| c.asset_id.clone()).collect(),
        short: legs.short.iter().map(|c| c.asset_id.clone()).collect(),
    })
}

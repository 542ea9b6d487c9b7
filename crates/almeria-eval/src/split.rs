//! In-sample / out-of-sample splitting.

use almeria_traits::{DailyReturn, Date, Panel, Result};
use tracing::debug;

/// A panel cut in two at a date.
///
/// Rows dated strictly before `split_date` are in-sample, the rest
/// out-of-sample. Running the engine on each half separately means the
/// out-of-sample run starts from a flat book.
#[derive(Debug, Clone)]
pub struct SampleSplit {
    /// First out-of-sample date
    pub split_date: Date,
    /// Rows with `date < split_date`
    pub in_sample: Panel,
    /// Rows with `date >= split_date`
    pub out_of_sample: Panel,
}

impl SampleSplit {
    /// Split `panel` on its `date_column`.
    ///
    /// Either half may be empty when the split date lies outside the panel.
    pub fn at(panel: &Panel, date_column: &str, split_date: Date) -> Result<Self> {
        let in_sample = panel.filter_dates(date_column, |d| d < split_date)?;
        let out_of_sample = panel.filter_dates(date_column, |d| d >= split_date)?;
        debug!(
            %split_date,
            in_sample = in_sample.len(),
            out_of_sample = out_of_sample.len(),
            "split panel"
        );

        Ok(Self {
            split_date,
            in_sample,
            out_of_sample,
        })
    }
}

/// Split a date-sorted return series at `split_date`.
pub fn split_series(series: &[DailyReturn], split_date: Date) -> (&[DailyReturn], &[DailyReturn]) {
    let idx = series.partition_point(|r| r.date < split_date);
    series.split_at(idx)
}

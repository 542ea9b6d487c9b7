//! Common types used throughout the Almeria framework.
//!
//! This module defines the panel of observations the engine consumes, the
//! column-role mapping that decouples the engine from concrete column names,
//! and the per-date records the engine produces.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{AlmeriaError, Result};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// An asset identifier, typically a ticker symbol like "AAPL".
pub type AssetId = String;

/// Days between 0001-01-01 (chrono's day 1 of the common era) and 1970-01-01
/// (day 0 of polars' `Date` type).
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// Names of the panel columns that play each role.
///
/// The engine never hardcodes column names; every lookup goes through a
/// `ColumnMap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Cross-sectional grouping key (calendar day).
    pub date: String,
    /// Asset identifier, unique within a date.
    pub asset: String,
    /// Predictive score.
    pub score: String,
    /// Realized return over the holding window that follows the score.
    pub forward_return: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            date: "date".to_string(),
            asset: "asset_id".to_string(),
            score: "score".to_string(),
            forward_return: "forward_return".to_string(),
        }
    }
}

impl ColumnMap {
    /// Pairs of (role, configured column name), in a fixed order.
    pub fn roles(&self) -> [(&'static str, &str); 4] {
        [
            ("date", self.date.as_str()),
            ("asset", self.asset.as_str()),
            ("score", self.score.as_str()),
            ("forward_return", self.forward_return.as_str()),
        ]
    }
}

/// One row of the panel: an asset on a date.
///
/// `score` and `forward_return` are `None` when the source cell is null or
/// holds a non-finite float.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Calendar day of the observation.
    pub date: Date,
    /// Asset identifier.
    pub asset_id: AssetId,
    /// Signal strength, if defined.
    pub score: Option<f64>,
    /// Realized forward return, if defined.
    pub forward_return: Option<f64>,
}

/// Container for the observation panel.
///
/// `Panel` wraps a Polars DataFrame with one row per (date, asset). Column
/// names are resolved through a [`ColumnMap`] at extraction time, so the same
/// panel can be read under different role assignments.
///
/// # Example
///
/// ```no_run
/// use almeria_traits::Panel;
/// use polars::prelude::*;
///
/// let df = df! {
///     "asset_id" => &["AAPL", "MSFT"],
///     "score" => &[0.4, -0.2],
///     "forward_return" => &[0.01, -0.005],
/// }.unwrap();
///
/// let panel = Panel::new(df);
/// ```
#[derive(Debug, Clone)]
pub struct Panel {
    /// The underlying DataFrame.
    data: DataFrame,
}

impl Panel {
    /// Creates a new `Panel` from a DataFrame.
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Returns the number of rows in the panel.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the panel is empty.
    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }

    /// Checks if a column exists in the panel.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Verifies that every role in `columns` names an existing column.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::MissingColumn`] naming the first absent role.
    pub fn validate_schema(&self, columns: &ColumnMap) -> Result<()> {
        for (role, name) in columns.roles() {
            if !self.has_column(name) {
                return Err(AlmeriaError::MissingColumn(format!(
                    "'{name}' (mapped to the {role} role)"
                )));
            }
        }
        Ok(())
    }

    /// Reads the date column as calendar days.
    ///
    /// Polars `Date` and `Datetime` columns are read natively; string columns
    /// are parsed as `YYYY-MM-DD`. Nulls stay `None`.
    pub fn dates(&self, name: &str) -> Result<Vec<Option<Date>>> {
        let column = self
            .data
            .column(name)
            .map_err(|_| AlmeriaError::MissingColumn(name.to_string()))?;
        let series = column.as_materialized_series();

        if matches!(series.dtype(), DataType::String) {
            return series
                .str()?
                .into_iter()
                .map(|s: Option<&str>| s.map(parse_date).transpose())
                .collect();
        }

        let casted = series.cast(&DataType::Date)?;
        Ok(casted
            .date()?
            .into_iter()
            .map(|d: Option<i32>| {
                d.and_then(|days| Date::from_num_days_from_ce_opt(days + CE_TO_UNIX_EPOCH_DAYS))
            })
            .collect())
    }

    /// Extracts every row as an [`Observation`].
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::MissingColumn`] if a role is not in the schema,
    /// and [`AlmeriaError::InvalidData`] for a row whose date or asset is null.
    pub fn observations(&self, columns: &ColumnMap) -> Result<Vec<Observation>> {
        self.validate_schema(columns)?;

        let dates = self.dates(&columns.date)?;
        let assets = self.strings(&columns.asset)?;
        let scores = self.floats(&columns.score)?;
        let returns = self.floats(&columns.forward_return)?;

        dates
            .into_iter()
            .zip(assets)
            .zip(scores.into_iter().zip(returns))
            .enumerate()
            .map(|(row, ((date, asset), (score, forward_return)))| {
                let date = date.ok_or_else(|| {
                    AlmeriaError::InvalidData(format!("row {row}: null '{}'", columns.date))
                })?;
                let asset_id = asset.ok_or_else(|| {
                    AlmeriaError::InvalidData(format!(
                        "row {row} ({date}): null '{}'",
                        columns.asset
                    ))
                })?;
                Ok(Observation {
                    date,
                    asset_id,
                    score,
                    forward_return,
                })
            })
            .collect()
    }

    /// Reads a numeric column, one entry per row. Nulls and non-finite
    /// values are `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::MissingColumn`] if `name` is not in the panel.
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        if !self.has_column(name) {
            return Err(AlmeriaError::MissingColumn(format!("'{name}'")));
        }
        self.floats(name)
    }

    /// Keeps only the rows whose date satisfies `keep`. Rows with a null date
    /// are dropped.
    pub fn filter_dates<F>(&self, date_column: &str, keep: F) -> Result<Self>
    where
        F: Fn(Date) -> bool,
    {
        let mask = self
            .dates(date_column)?
            .into_iter()
            .map(|d| d.is_some_and(&keep))
            .collect::<BooleanChunked>();

        Ok(Self::new(self.data.filter(&mask)?))
    }

    fn strings(&self, name: &str) -> Result<Vec<Option<String>>> {
        let series = self
            .data
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        Ok(series
            .str()?
            .into_iter()
            .map(|s: Option<&str>| s.map(str::to_owned))
            .collect())
    }

    fn floats(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let series = self
            .data
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series
            .f64()?
            .into_iter()
            .map(|v: Option<f64>| v.filter(|x| x.is_finite()))
            .collect())
    }
}

fn parse_date(s: &str) -> Result<Date> {
    Date::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| AlmeriaError::InvalidDate(format!("'{s}': {e}")))
}

impl From<DataFrame> for Panel {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for Panel {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}

/// The engine's result for one date: both leg averages, their spread, and
/// the members of each leg in rank order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySpread {
    /// Date of the cross-section.
    pub date: Date,
    /// Equal-weighted mean forward return of the long leg.
    pub long_return: f64,
    /// Equal-weighted mean forward return of the short leg.
    pub short_return: f64,
    /// `long_return - short_return`, before costs.
    pub gross_return: f64,
    /// Long leg members, highest score first.
    pub long: Vec<AssetId>,
    /// Short leg members, highest score first.
    pub short: Vec<AssetId>,
}

/// A dated portfolio return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyReturn {
    /// Date of the return.
    pub date: Date,
    /// Return as a fraction (0.01 = 1%).
    pub value: f64,
}

impl DailyReturn {
    /// Create a new dated return.
    pub const fn new(date: Date, value: f64) -> Self {
        Self { date, value }
    }
}

//! Error types for the Almeria framework.
//!
//! Two families live here. [`AlmeriaError`] covers fatal failures: bad
//! configuration, a panel whose schema does not match the configured column
//! roles, or corrupt rows. [`SkipReason`] covers per-date problems that only
//! remove a single date from the output; those are collected into the run's
//! report as [`SkippedDate`] records instead of aborting the run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{AssetId, Date};

/// The main error type for Almeria operations.
#[derive(Debug, Error)]
pub enum AlmeriaError {
    /// Invalid engine or cost configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A configured column role is absent from the panel schema.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A date value could not be interpreted.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Error raised by a signal provider while producing a panel.
    #[error("Signal provider '{provider}' failed: {message}")]
    Provider {
        /// Name of the failing provider.
        provider: String,
        /// Provider-specific failure description.
        message: String,
    },

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl AlmeriaError {
    /// Returns `true` for errors that stem from the configuration surface.
    ///
    /// A column role that cannot be found in the supplied panel counts as a
    /// configuration error: the mapping, not the data, is wrong.
    pub const fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::MissingColumn(_))
    }
}

impl From<String> for AlmeriaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for AlmeriaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Almeria operations.
pub type Result<T> = std::result::Result<T, AlmeriaError>;

/// Why a single date was excluded from the return series.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Too few valid observations to form disjoint, non-empty legs.
    #[error("insufficient data: {available} valid observations, {required} required")]
    InsufficientData {
        /// Valid observations present on the date.
        available: usize,
        /// Minimum needed to form both legs.
        required: usize,
    },

    /// The same asset appears more than once on the date.
    #[error("data integrity: duplicate asset '{asset}'")]
    DuplicateAsset {
        /// The repeated asset identifier.
        asset: AssetId,
    },
}

/// A date excluded from the output, with the reason attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedDate {
    /// The excluded date.
    pub date: Date,
    /// Why it was excluded.
    pub reason: SkipReason,
}

impl SkippedDate {
    /// Create a new skipped-date record.
    pub const fn new(date: Date, reason: SkipReason) -> Self {
        Self { date, reason }
    }
}

impl std::fmt::Display for SkippedDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.date, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AlmeriaError::Configuration("group_fraction must be in (0, 0.5]".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: group_fraction must be in (0, 0.5]"
        );

        let err = AlmeriaError::MissingColumn("score".to_string());
        assert_eq!(err.to_string(), "Missing required column: score");
    }

    #[test]
    fn test_is_configuration() {
        assert!(AlmeriaError::Configuration("x".into()).is_configuration());
        assert!(AlmeriaError::MissingColumn("x".into()).is_configuration());
        assert!(!AlmeriaError::InvalidData("x".into()).is_configuration());
        assert!(!AlmeriaError::from("x").is_configuration());
    }

    #[test]
    fn test_skipped_date_display_names_date_and_asset() {
        let date = Date::from_ymd_opt(2024, 3, 1).unwrap();
        let skipped = SkippedDate::new(
            date,
            SkipReason::DuplicateAsset {
                asset: "MSFT".to_string(),
            },
        );
        let rendered = skipped.to_string();
        assert!(rendered.contains("2024-03-01"));
        assert!(rendered.contains("MSFT"));
    }

    #[test]
    fn test_insufficient_data_display() {
        let reason = SkipReason::InsufficientData {
            available: 1,
            required: 2,
        };
        assert_eq!(
            reason.to_string(),
            "insufficient data: 1 valid observations, 2 required"
        );
    }
}

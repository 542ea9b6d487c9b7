#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almeria/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type and trait definitions for the Almeria backtesting engine.
//!
//! This crate provides the vocabulary every other Almeria crate speaks: the
//! [`Panel`] of per-date, per-asset observations, the [`ColumnMap`] that tells
//! the engine which columns play which role, the [`DailySpread`] and
//! [`DailyReturn`] records the engine emits, and the [`SignalProvider`] seam
//! through which panels enter the system.

/// The version of the almeria-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod error;
pub mod provider;
pub mod types;

// Re-exports
pub use error::{AlmeriaError, Result, SkipReason, SkippedDate};
pub use provider::SignalProvider;
pub use types::{
    AssetId, CE_TO_UNIX_EPOCH_DAYS, ColumnMap, DailyReturn, DailySpread, Date, Observation, Panel,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}

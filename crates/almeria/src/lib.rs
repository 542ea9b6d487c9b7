#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/almeria/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # almeria
//!
//! almeria is an umbrella crate that re-exports all almeria sub-crates for
//! convenience.
//!
//! ## Quick Start
//!
//! ```ignore
//! use almeria::prelude::*;
//!
//! # fn main() -> almeria::Result<()> {
//! let panel = Panel::new(df);
//! let engine = SpreadEngine::new(EngineConfig {
//!     group_fraction: 0.1,
//!     cost_per_unit: 0.0005,
//!     ..Default::default()
//! })?;
//!
//! let report = engine.run(&panel)?;
//! let summary = PerformanceSummary::from_series(&report.net, &PerformanceConfig::default());
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Pipeline
//!
//! 1. **Filter** drops rows with an undefined score or forward return
//! 2. **Rank** orders each date by score, ties broken by asset id
//! 3. **Legs** take the top and bottom `ceil(n * group_fraction)` assets
//! 4. **Spread** is the long leg mean minus the short leg mean
//! 5. **Costs** turn the gross series into the net series
//!
//! Steps 1 to 4 are independent per date. Only the cost stage looks across
//! dates, and only for the turnover-proportional model.

/// Version information for the almeria crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Core Types
// ============================================================================

/// Core types, the provider trait and errors.
pub mod traits {
    pub use almeria_traits::*;
}

pub use almeria_traits::{
    AlmeriaError, DailyReturn, DailySpread, Date, Observation, Panel, Result, SignalProvider,
    SkipReason, SkippedDate,
};

// ============================================================================
// Engine
// ============================================================================

/// Ranking, leg selection and the spread engine.
///
/// ```ignore
/// use almeria::engine::{EngineConfig, SpreadEngine};
///
/// let engine = SpreadEngine::new(EngineConfig::from_json(r#"{ "group_fraction": 0.2 }"#)?)?;
/// let report = engine.run(&panel)?;
/// ```
pub mod engine {
    pub use almeria_engine::*;
}

pub use almeria_engine::{EngineConfig, SpreadEngine, SpreadReport, UniverseFilter};

// ============================================================================
// Cost Models
// ============================================================================

/// Transaction cost models.
///
/// - **FlatPerDay**: a constant deduction on every reported day
/// - **TurnoverProportional**: cost proportional to two-way turnover of the
///   equal-weight book, starting from a flat book
pub mod costs {
    pub use almeria_costs::*;
}

pub use almeria_costs::{CostModel, CostModelKind};

// ============================================================================
// Evaluation
// ============================================================================

/// Analysis of engine output.
///
/// ```text
/// Sharpe = mean(r) / std(r) * sqrt(252)
/// IC_t   = spearman(score_t, forward_return_t)
/// IR     = mean(IC) / std(IC)
/// ```
pub mod eval {
    pub use almeria_eval::*;
}

pub use almeria_eval::{PerformanceConfig, PerformanceSummary};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```ignore
/// use almeria::prelude::*;
/// ```
pub mod prelude {
    pub use crate::traits::{ColumnMap, DailyReturn, DailySpread, Date, Panel, SignalProvider};
    pub use crate::{AlmeriaError, Result};
    pub use crate::{CostModel, CostModelKind};
    pub use crate::{EngineConfig, SpreadEngine, SpreadReport, UniverseFilter};
    pub use crate::{PerformanceConfig, PerformanceSummary};
}

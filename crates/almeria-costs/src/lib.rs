//! Transaction cost models for Almeria spread series.
//!
//! Costs are a post-processing stage: they consume the engine's per-date
//! [`DailySpread`](almeria_traits::DailySpread) records and return a net
//! return series, leaving the gross series untouched. Two models are
//! provided:
//!
//! - [`FlatPerDay`]: subtract a constant every day.
//! - [`TurnoverProportional`]: subtract a cost proportional to the absolute
//!   change in position weights since the previous rebalancing date.
//!
//! # Examples
//!
//! ```rust,ignore
//! use almeria_costs::{CostModel, CostModelKind};
//!
//! let model = CostModelKind::TurnoverProportional.build(0.0005);
//! let net = model.apply(&spreads);
//! ```

mod cost_model;
mod flat;
mod turnover;

// Re-export main types
pub use cost_model::{CostModel, CostModelKind};
pub use flat::FlatPerDay;
pub use turnover::{PositionWeights, TurnoverProportional, position_weights, turnover};

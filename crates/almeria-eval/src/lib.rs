//! Analysis of almeria spread series.
//!
//! The engine itself computes no statistics. This crate consumes its output
//! and the underlying panel to provide:
//! - Performance summaries (mean, volatility, Sharpe, hit rate, drawdown)
//! - Information Coefficient (IC) per date and its IR summary
//! - An equal-weight benchmark over the whole universe
//! - In-sample / out-of-sample splitting by date
//!
//! # Example
//!
//! ```rust,ignore
//! use almeria_eval::{PerformanceConfig, PerformanceSummary, SampleSplit};
//!
//! let split = SampleSplit::at(&panel, "date", split_date)?;
//! let report = engine.run(&split.out_of_sample)?;
//! let summary = PerformanceSummary::from_series(&report.net, &PerformanceConfig::default());
//! println!("{summary}");
//! ```

pub mod benchmark;
pub mod ic;
pub mod performance;
pub mod split;

// Re-export main types
pub use benchmark::{equal_weight_benchmark, excess_returns};
pub use ic::{DailyIc, IcSummary, calculate_ic, ic_series};
pub use performance::{PerformanceConfig, PerformanceSummary, max_drawdown};
pub use split::{SampleSplit, split_series};

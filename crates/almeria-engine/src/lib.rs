//! Cross-sectional ranking and long/short return engine.
//!
//! For every date in a panel the engine:
//! 1. drops observations outside the optional [`UniverseFilter`] and those
//!    with an undefined score or forward return,
//! 2. ranks the remaining assets by score (ties broken by asset id),
//! 3. takes the top and bottom `group_fraction` as the long and short legs,
//! 4. averages each leg's forward returns and reports the spread,
//!
//! and then runs the configured cost model over the spread series to obtain
//! the net returns. Dates are independent until the cost stage, so the first
//! four steps run in parallel.
//!
//! # Example
//!
//! ```rust,ignore
//! use almeria_engine::{EngineConfig, SpreadEngine};
//!
//! let engine = SpreadEngine::new(EngineConfig::default())?;
//! let report = engine.run(&panel)?;
//! for r in &report.net {
//!     println!("{} {:+.4}", r.date, r.value);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod filter;
pub mod legs;
pub mod rank;
pub mod report;
pub mod spread;
pub mod universe;

// Re-export main types
pub use config::{DuplicatePolicy, EngineConfig, MAX_GROUP_FRACTION};
pub use engine::SpreadEngine;
pub use filter::{
    Candidate, CrossSection, FilterOutcome, cross_sections, cross_sections_in_universe,
    resolve_duplicates,
};
pub use legs::leg_return;
pub use rank::{Legs, Ranker, group_size};
pub use report::SpreadReport;
pub use spread::daily_spread;
pub use universe::UniverseFilter;

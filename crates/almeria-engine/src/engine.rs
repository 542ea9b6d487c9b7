//! The ranking and return engine.

use almeria_traits::{
    DailyReturn, DailySpread, Panel, Result, SignalProvider, SkipReason, SkippedDate,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::filter::{CrossSection, cross_sections, cross_sections_in_universe, resolve_duplicates};
use crate::rank::Ranker;
use crate::report::SpreadReport;
use crate::spread::daily_spread;

/// Outcome of ranking a single date.
type Evaluated = std::result::Result<DailySpread, SkippedDate>;

/// Long/short spread engine.
///
/// Holds only its configuration; every [`run`](Self::run) is a pure function
/// of the panel it receives, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct SpreadEngine {
    config: EngineConfig,
}

impl SpreadEngine {
    /// Create an engine, rejecting invalid configurations up front.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use almeria_engine::{EngineConfig, SpreadEngine};
    ///
    /// let engine = SpreadEngine::new(EngineConfig {
    ///     group_fraction: 0.2,
    ///     ..Default::default()
    /// })?;
    /// ```
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch a panel from `provider` and run on it.
    pub fn run_provider(&self, provider: &dyn SignalProvider) -> Result<SpreadReport> {
        debug!(provider = provider.name(), "loading panel");
        let panel = provider.panel()?;
        self.run(&panel)
    }

    /// Run the engine over a panel.
    ///
    /// # Errors
    ///
    /// Fails only for problems that affect the whole panel: a column role or
    /// the universe column missing from the schema, or a row without a date
    /// or asset. Per-date
    /// problems land in [`SpreadReport::skipped`].
    pub fn run(&self, panel: &Panel) -> Result<SpreadReport> {
        let observations = panel.observations(&self.config.columns)?;
        let outcome = match &self.config.universe {
            Some(universe) => {
                let keys = panel.values(&universe.column)?;
                cross_sections_in_universe(&observations, &keys, universe)
            }
            None => cross_sections(&observations),
        };
        debug!(
            rows = observations.len(),
            dates = outcome.sections.len(),
            dropped = outcome.dropped,
            outside_universe = outcome.outside_universe,
            "filtered panel"
        );

        let sections = outcome.sections;
        let evaluated: Vec<Evaluated> = if self.config.parallel {
            sections
                .into_par_iter()
                .map(|section| self.evaluate(section))
                .collect()
        } else {
            sections
                .into_iter()
                .map(|section| self.evaluate(section))
                .collect()
        };

        let mut spreads = Vec::with_capacity(evaluated.len());
        let mut skipped = Vec::new();
        for result in evaluated {
            match result {
                Ok(spread) => spreads.push(spread),
                Err(skip) => {
                    warn!(date = %skip.date, reason = %skip.reason, "skipping date");
                    skipped.push(skip);
                }
            }
        }
        spreads.sort_by_key(|s| s.date);
        skipped.sort_by_key(|s| s.date);

        let gross = spreads
            .iter()
            .map(|s| DailyReturn::new(s.date, s.gross_return))
            .collect();
        // Path-dependent models read the previous date's legs, so this stage
        // always runs in date order after the parallel section.
        debug!(
            cost_model = %self.config.cost_model,
            path_dependent = self.config.cost_model.is_path_dependent(),
            days = spreads.len(),
            "applying costs"
        );
        let net = self
            .config
            .cost_model
            .build(self.config.cost_per_unit)
            .apply(&spreads);

        info!(
            days = spreads.len(),
            skipped = skipped.len(),
            cost_model = %self.config.cost_model,
            "spread run complete"
        );

        Ok(SpreadReport {
            spreads,
            gross,
            net,
            skipped,
            dropped_observations: outcome.dropped,
            outside_universe: outcome.outside_universe,
            cost_model: self.config.cost_model,
        })
    }

    /// Rank one date and compute its spread.
    fn evaluate(&self, section: CrossSection) -> Evaluated {
        let date = section.date;
        let section = resolve_duplicates(section, self.config.duplicate_policy)
            .map_err(|reason| SkippedDate::new(date, reason))?;

        let ranker = Ranker::new(self.config.group_fraction, self.config.min_observations);
        let legs = ranker
            .select(&section.candidates)
            .map_err(|reason| SkippedDate::new(date, reason))?;

        // select() never returns an empty leg
        daily_spread(date, &legs).ok_or_else(|| {
            SkippedDate::new(
                date,
                SkipReason::InsufficientData {
                    available: section.candidates.len(),
                    required: self.config.min_observations,
                },
            )
        })
    }
}

//! Signal provider trait for supplying observation panels.
//!
//! Feature engineering and signal construction live outside Almeria. A
//! `SignalProvider` is the seam through which their output enters: it hands
//! the engine a [`Panel`] holding a score and a realized forward return for
//! every (date, asset) pair.

use crate::{Panel, Result};

/// A source of scored, return-annotated panels.
///
/// # Look-ahead contract
///
/// The engine never checks timing. For every row a provider emits, the
/// forward return must cover a holding window that starts strictly after the
/// information used to compute the score became available. A provider that
/// violates this produces a backtest with look-ahead bias, and the engine has
/// no way to notice.
///
/// # Example
///
/// ```no_run
/// use almeria_traits::{Panel, Result, SignalProvider};
/// use polars::prelude::*;
///
/// struct InMemory(DataFrame);
///
/// impl SignalProvider for InMemory {
///     fn name(&self) -> &str {
///         "in_memory"
///     }
///
///     fn panel(&self) -> Result<Panel> {
///         Ok(Panel::new(self.0.clone()))
///     }
/// }
/// ```
pub trait SignalProvider: Send + Sync {
    /// Returns the name of this provider, used in logs and error messages.
    fn name(&self) -> &str;

    /// Produces the panel of observations.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying source cannot be read or does not
    /// yield a table.
    fn panel(&self) -> Result<Panel>;
}

impl SignalProvider for Panel {
    fn name(&self) -> &str {
        "panel"
    }

    fn panel(&self) -> Result<Panel> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_panel_is_its_own_provider() {
        let df = df! {
            "asset_id" => &["AAPL", "MSFT"],
            "score" => &[1.0, -1.0],
        }
        .unwrap();

        let panel = Panel::new(df);
        let provided = SignalProvider::panel(&panel).unwrap();
        assert_eq!(provided.len(), 2);
        assert_eq!(SignalProvider::name(&panel), "panel");
    }
}

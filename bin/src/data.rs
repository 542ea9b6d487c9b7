//! Data loading utilities for the almeria CLI.

use std::path::{Path, PathBuf};

use almeria_traits::{AlmeriaError, Date, Panel, Result, SignalProvider};
use polars::prelude::*;
use tracing::info;

/// A panel stored as a CSV file with a header row.
#[derive(Debug, Clone)]
pub(crate) struct CsvPanel {
    path: PathBuf,
    name: String,
}

impl CsvPanel {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl SignalProvider for CsvPanel {
    fn name(&self) -> &str {
        &self.name
    }

    fn panel(&self) -> Result<Panel> {
        if !self.path.exists() {
            return Err(AlmeriaError::Provider {
                provider: "csv".to_string(),
                message: format!("{} does not exist", self.name),
            });
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .map_parse_options(|opts| opts.with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(self.path.clone()))?
            .finish()?;

        info!(path = %self.name, rows = df.height(), columns = df.width(), "loaded panel");
        Ok(Panel::new(df))
    }
}

/// Write a DataFrame to `path` as CSV.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path).map_err(|e| AlmeriaError::Provider {
        provider: "csv".to_string(),
        message: format!("cannot create {}: {e}", path.display()),
    })?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Parse a date string in YYYY-MM-DD format.
pub(crate) fn parse_date(date_str: &str) -> Result<Date> {
    Date::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
        AlmeriaError::InvalidDate(format!(
            "Invalid date format '{date_str}': {e}. Expected YYYY-MM-DD"
        ))
    })
}

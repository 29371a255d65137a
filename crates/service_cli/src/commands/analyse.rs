//! Analyse command implementation
//!
//! Loads two numeric columns from a CSV file and prints the local
//! correlation report.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::summary::run_analysis;
use crate::config::CliConfig;
use crate::{CliError, Result};

/// Paired columns read from a CSV source.
#[derive(Debug, Default, PartialEq)]
pub struct Columns {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    /// Rows skipped because a value was missing, unparseable or non-finite
    pub dropped: usize,
}

/// Read columns `x_column` and `y_column` from headed CSV data.
pub fn load_columns<R: Read>(reader: R, x_column: &str, y_column: &str) -> Result<Columns> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CliError::ColumnNotFound(name.to_string()))
    };
    let xi = position(x_column)?;
    let yi = position(y_column)?;

    let mut columns = Columns::default();
    for record in reader.records() {
        let record = record?;
        let parse = |i: usize| {
            record
                .get(i)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        match (parse(xi), parse(yi)) {
            (Some(x), Some(y)) => {
                columns.xs.push(x);
                columns.ys.push(y);
            }
            _ => columns.dropped += 1,
        }
    }
    Ok(columns)
}

/// Run the analyse command
pub fn run(input: &Path, x_column: &str, y_column: &str, config: &CliConfig) -> Result<()> {
    info!("Starting analysis...");
    info!("  Input: {}", input.display());
    info!("  Columns: {} / {}", x_column, y_column);

    if !input.exists() {
        return Err(CliError::FileNotFound(input.display().to_string()));
    }

    let columns = load_columns(File::open(input).map_err(csv::Error::from)?, x_column, y_column)?;
    if columns.dropped > 0 {
        warn!("Dropped {} rows with missing or non-finite values", columns.dropped);
    }

    let report = run_analysis(&columns.xs, &columns.ys, columns.dropped, config)?;
    println!("{}", report);
    Ok(())
}

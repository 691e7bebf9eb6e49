//! Ticker universe loading from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::{DataSourceError, Ticker};

/// Read the tickers of `column` from the CSV file at `path`.
///
/// File order and duplicates are preserved.
pub fn load_universe(path: &Path, column: &str) -> Result<Vec<Ticker>, DataSourceError> {
    let file = File::open(path).map_err(|source| DataSourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let tickers = read_universe(file, column)?;
    debug!(path = %path.display(), count = tickers.len(), "loaded ticker universe");
    Ok(tickers)
}

/// Read the tickers of `column` from any CSV reader with a header row.
pub fn read_universe<R: Read>(reader: R, column: &str) -> Result<Vec<Ticker>, DataSourceError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let index = reader
        .headers()?
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| DataSourceError::MissingColumn {
            column: column.to_owned(),
        })?;

    let mut tickers = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let record = record?;
        // Header is row 1.
        let row = offset + 2;
        let cell = record.get(index).unwrap_or_default();
        let ticker = Ticker::parse(cell).map_err(|_| DataSourceError::EmptyTicker { row })?;
        tickers.push(ticker);
    }

    Ok(tickers)
}

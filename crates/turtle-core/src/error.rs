use std::path::PathBuf;

use thiserror::Error;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
}

/// Failure to load the ticker universe. Always fatal for a scan.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("universe file '{path}' could not be opened: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("universe is malformed: {0}")]
    Malformed(#[from] csv::Error),

    #[error("universe is missing the '{column}' column")]
    MissingColumn { column: String },

    #[error("universe row {row} has an empty ticker")]
    EmptyTicker { row: usize },
}

impl DataSourceError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Open { .. } => "universe.open",
            Self::Malformed(_) => "universe.malformed",
            Self::MissingColumn { .. } => "universe.missing_column",
            Self::EmptyTicker { .. } => "universe.empty_ticker",
        }
    }
}

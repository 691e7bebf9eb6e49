use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] turtle_core::ValidationError),

    #[error(transparent)]
    Universe(#[from] turtle_core::DataSourceError),

    #[error("{0}")]
    Source(#[from] turtle_core::SourceError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Universe(_) => 2,
            Self::Source(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }

    /// Stable machine-readable code for stream error events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "cli.validation",
            Self::Universe(error) => error.code(),
            Self::Source(error) => error.code(),
            Self::Serialization(_) => "cli.serialization",
            Self::Io(_) => "cli.io",
        }
    }
}

mod fresh_highs;
mod performance;
mod profit;
mod scan;

use serde::Serialize;
use serde_json::Value;
use turtle_core::{EventSink, Screener};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output::Table;

pub struct CommandResult {
    pub data: Value,
    pub table: Table,
    pub warnings: Vec<String>,
}

impl CommandResult {
    pub fn ok<T: Serialize>(data: &T, table: Table) -> Result<Self, CliError> {
        Ok(Self {
            data: serde_json::to_value(data)?,
            table,
            warnings: Vec::new(),
        })
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

pub async fn run(cli: &Cli, sink: &dyn EventSink) -> Result<CommandResult, CliError> {
    let config = cli.settings.to_config()?;
    let screener = Screener::from_config(&config);

    match &cli.command {
        Command::Scan(args) => scan::run(args, &config, &screener, sink).await,
        Command::FreshHighs(args) => fresh_highs::run(args, &config, &screener, sink).await,
        Command::Profit(args) => profit::run(args, &screener).await,
        Command::Performance(args) => performance::run(args, &screener).await,
    }
}

pub(crate) fn yes_no(flag: bool) -> String {
    String::from(if flag { "Yes" } else { "No" })
}

pub(crate) fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{v:.2}%"))
}

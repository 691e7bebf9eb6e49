use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Exchange-qualified ticker such as `RELIANCE.NS`.
///
/// Only presence is validated: the universe file is trusted to contain
/// symbols the upstream providers understand.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyTicker);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// For compile-time constants known to be non-blank.
    pub(crate) fn from_static(value: &'static str) -> Self {
        Self(value.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Symbol with the exchange suffix removed, as indexed by sources that
    /// key companies by bare symbol. Tickers without the suffix are returned
    /// unchanged.
    pub fn bare_symbol(&self, exchange_suffix: &str) -> &str {
        if exchange_suffix.is_empty() {
            return self.as_str();
        }

        self.0
            .strip_suffix(exchange_suffix)
            .filter(|bare| !bare.is_empty())
            .unwrap_or(&self.0)
    }
}

impl Display for Ticker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Ticker {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for Ticker {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

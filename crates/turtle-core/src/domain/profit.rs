use serde::{Deserialize, Serialize};

/// Period label of the trailing-twelve-months column.
pub const TTM_PERIOD: &str = "TTM";

/// Net profit row as scraped: period label to raw cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfitTable {
    pub entries: Vec<(String, String)>,
}

impl RawProfitTable {
    /// Pair period labels with cell values; surplus on either side is dropped.
    pub fn zip(periods: Vec<String>, values: Vec<String>) -> Self {
        Self {
            entries: periods.into_iter().zip(values).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One reporting period of a [`ProfitRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitPeriod {
    pub period: String,
    pub net_profit: Option<f64>,
}

/// Net profit by reporting period, chronological, with unparseable cells kept
/// as `None` rather than zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfitRecord {
    pub periods: Vec<ProfitPeriod>,
}

impl ProfitRecord {
    pub fn from_raw(raw: &RawProfitTable) -> Self {
        let periods = raw
            .entries
            .iter()
            .map(|(period, value)| ProfitPeriod {
                period: period.clone(),
                net_profit: clean_number(value),
            })
            .collect();

        Self { periods }
    }

    /// Build directly from already-parsed values.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<f64>)>,
        S: Into<String>,
    {
        Self {
            periods: values
                .into_iter()
                .map(|(period, net_profit)| ProfitPeriod {
                    period: period.into(),
                    net_profit,
                })
                .collect(),
        }
    }

    /// Cleaned TTM value. With duplicate TTM columns the rightmost wins.
    pub fn ttm(&self) -> Option<f64> {
        self.periods
            .iter()
            .rev()
            .find(|entry| entry.period.trim() == TTM_PERIOD)
            .and_then(|entry| entry.net_profit)
    }

    /// Maximum over every period with a value, TTM included.
    pub fn max_value(&self) -> Option<f64> {
        self.periods
            .iter()
            .filter_map(|entry| entry.net_profit)
            .fold(None, |max, value| match max {
                Some(current) if current >= value => Some(current),
                _ => Some(value),
            })
    }

    /// True when the TTM profit ties or sets the all-period maximum.
    pub fn is_ttm_peak(&self) -> bool {
        match (self.ttm(), self.max_value()) {
            (Some(ttm), Some(max)) => ttm == max,
            _ => false,
        }
    }
}

/// Parse a scraped numeric cell.
///
/// Thousands separators and surrounding whitespace are removed. Blank cells,
/// placeholder dashes and anything that does not parse to a finite number
/// yield `None`.
pub fn clean_number(raw: &str) -> Option<f64> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();

    if matches!(cleaned, "" | "-" | "\u{2014}") {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

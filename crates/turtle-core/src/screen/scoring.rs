use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::Ticker;

/// Scoring row for a ticker that made a fresh all-time high.
///
/// Flags are fixed at construction; the score is always derived from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    ticker: Ticker,
    ath_profit: bool,
    outperformance: bool,
}

impl CandidateRow {
    /// Membership in the candidate list already proves the price signal.
    pub fn new(ticker: Ticker, ath_profit: bool, outperformance: bool) -> Self {
        Self {
            ticker,
            ath_profit,
            outperformance,
        }
    }

    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub const fn ath_price(&self) -> bool {
        true
    }

    pub const fn ath_profit(&self) -> bool {
        self.ath_profit
    }

    pub const fn outperformance(&self) -> bool {
        self.outperformance
    }

    pub fn score(&self) -> u8 {
        u8::from(self.ath_price()) + u8::from(self.ath_profit) + u8::from(self.outperformance)
    }
}

impl Serialize for CandidateRow {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut row = serializer.serialize_struct("CandidateRow", 5)?;
        row.serialize_field("ticker", &self.ticker)?;
        row.serialize_field("ath_price", &self.ath_price())?;
        row.serialize_field("ath_profit", &self.ath_profit)?;
        row.serialize_field("outperformance", &self.outperformance)?;
        row.serialize_field("score", &self.score())?;
        row.end()
    }
}

/// Sort rows by descending score. Equal scores keep their incoming order.
pub fn rank(mut rows: Vec<CandidateRow>) -> Vec<CandidateRow> {
    rows.sort_by(|a, b| b.score().cmp(&a.score()));
    rows
}

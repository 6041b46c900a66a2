//! Output rows of the collected dataset.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::types::{Market, SettlementResult};
use crate::snapshots::CheckpointPrices;

/// One output record per analyzed market. Field order is the column order
/// of the CSV artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Market ticker.
    pub ticker: String,
    /// Derived event ticker.
    pub event_ticker: String,
    /// Close time as reported by the API (RFC 3339).
    pub close_time: String,
    /// Settlement result string.
    pub result: String,
    /// 1 when the result is yes, else 0.
    pub result_binary: u8,
    /// Traded volume in contracts.
    pub volume: i64,
    /// Last traded price in cents.
    pub last_price: Option<i64>,
    /// Probability nearest 15 minutes before close.
    pub price_15min: Option<Decimal>,
    /// Probability nearest 10 minutes before close.
    pub price_10min: Option<Decimal>,
    /// Probability nearest 5 minutes before close.
    pub price_5min: Option<Decimal>,
    /// Probability nearest 1 minute before close.
    pub price_1min: Option<Decimal>,
    /// Snapshots observed in the reconstruction window.
    pub snapshots_in_window: u32,
}

/// Binary encoding of a settlement result: 1 iff it reads yes,
/// case-insensitively.
pub fn result_binary(result: &str) -> u8 {
    matches!(SettlementResult::from_str(result), Ok(SettlementResult::Yes)) as u8
}

impl ResultRow {
    /// Assemble the row for one analyzed market.
    ///
    /// A `checkpoints` of `None` produces the two-sided null: four absent
    /// prices together with a zero snapshot count.
    pub fn assemble(
        market: &Market,
        event_ticker: &str,
        close_time: &str,
        result: &str,
        last_price: Option<i64>,
        checkpoints: Option<CheckpointPrices>,
    ) -> Self {
        let (price_15min, price_10min, price_5min, price_1min, snapshots_in_window) =
            match checkpoints {
                Some(c) => (
                    Some(c.price_15min),
                    Some(c.price_10min),
                    Some(c.price_5min),
                    Some(c.price_1min),
                    c.snapshots_in_window,
                ),
                None => (None, None, None, None, 0),
            };

        Self {
            ticker: market.ticker.clone(),
            event_ticker: event_ticker.to_string(),
            close_time: close_time.to_string(),
            result: result.to_string(),
            result_binary: result_binary(result),
            volume: market.volume,
            last_price,
            price_15min,
            price_10min,
            price_5min,
            price_1min,
            snapshots_in_window,
        }
    }
}

//! Trade-window retrieval and snapshot conversion.

use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::market::types::{parse_timestamp, TradeRecord, TradesQuery};
use crate::market::KalshiClient;

/// A (timestamp, probability) point observed in a trade window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSnapshot {
    /// When the trade executed.
    pub ts: OffsetDateTime,
    /// Yes probability in [0, 1].
    pub probability: Decimal,
}

/// Convert a yes price in integer cents to a probability.
pub fn cents_to_probability(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Snapshots for the trades that carry both a timestamp and a price, in
/// list order. Trades missing either field, or with a timestamp that does
/// not parse, are dropped.
pub fn snapshots_from_trades(trades: &[TradeRecord]) -> Vec<PriceSnapshot> {
    trades
        .iter()
        .filter_map(|trade| {
            let raw_ts = trade.created_time.as_deref()?;
            let cents = trade.yes_price?;
            match parse_timestamp(raw_ts) {
                Ok(ts) => Some(PriceSnapshot {
                    ts,
                    probability: cents_to_probability(cents),
                }),
                Err(error) => {
                    debug!(%error, raw_ts, "dropping trade with unparseable timestamp");
                    None
                }
            }
        })
        .collect()
}

/// Fetch the trades of a market inside `[start, end]` and convert them into
/// snapshots.
///
/// A fetch failure is logged and absorbed: the caller sees an empty list
/// and the run continues.
pub async fn fetch_window_snapshots(
    client: &KalshiClient,
    ticker: &str,
    start: OffsetDateTime,
    end: OffsetDateTime,
    limit: u32,
) -> Vec<PriceSnapshot> {
    let query = TradesQuery {
        ticker: ticker.to_string(),
        min_ts: start.unix_timestamp(),
        max_ts: end.unix_timestamp(),
        limit,
    };

    let page = match client.trades_page(&query).await {
        Ok(page) => page,
        Err(error) => {
            warn!(%error, ticker, "trade window fetch failed, treating as empty");
            return Vec::new();
        }
    };

    let snapshots = snapshots_from_trades(&page.trades);
    debug!(
        ticker,
        trades = page.trades.len(),
        snapshots = snapshots.len(),
        "trade window fetched"
    );
    snapshots
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trade(created_time: Option<&str>, yes_price: Option<i64>) -> TradeRecord {
        TradeRecord {
            created_time: created_time.map(str::to_string),
            yes_price,
        }
    }

    #[test]
    fn cents_convert_to_exact_probabilities() {
        assert_eq!(cents_to_probability(55), dec!(0.55));
        assert_eq!(cents_to_probability(60), dec!(0.60));
        assert_eq!(cents_to_probability(0), dec!(0));
        assert_eq!(cents_to_probability(100), dec!(1));
    }

    #[test]
    fn conversion_drops_incomplete_trades() {
        let trades = vec![
            trade(Some("2025-11-14T16:50:00Z"), Some(55)),
            trade(None, Some(60)),
            trade(Some("2025-11-14T16:58:00Z"), None),
            trade(Some("2025-11-14T16:59:00Z"), Some(60)),
        ];

        let snapshots = snapshots_from_trades(&trades);
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].probability, dec!(0.55));
        assert_eq!(snapshots[1].probability, dec!(0.60));
        assert!(snapshots[0].ts < snapshots[1].ts);
    }

    #[test]
    fn conversion_drops_unparseable_timestamps() {
        let trades = vec![
            trade(Some("not-a-timestamp"), Some(40)),
            trade(Some("2025-11-14T16:59:00Z"), Some(41)),
        ];

        let snapshots = snapshots_from_trades(&trades);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].probability, dec!(0.41));
    }

    #[test]
    fn zero_price_trades_are_kept() {
        let trades = vec![trade(Some("2025-11-14T16:59:00Z"), Some(0))];
        let snapshots = snapshots_from_trades(&trades);
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].probability, dec!(0));
    }
}

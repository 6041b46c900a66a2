//! Market-related types for the Kalshi hourly BTC series.

use serde::Deserialize;
use strum::{Display, EnumString};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Market lifecycle status, used as a discovery filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MarketStatus {
    /// Open for trading.
    Active,
    /// Trading finished, settlement pending.
    Closed,
    /// Settled with a final result.
    Settled,
}

/// Final yes/no outcome of a settled market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SettlementResult {
    /// Market resolved yes.
    Yes,
    /// Market resolved no.
    No,
}

/// Parse an RFC 3339 timestamp as the API reports them.
pub fn parse_timestamp(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(raw, &Rfc3339)
}

/// One market as returned by the markets-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Market {
    /// Market ticker (e.g., "KXBTCD-25NOV1417-T100249.99").
    pub ticker: String,
    /// Lifecycle status as reported by the API.
    #[serde(default)]
    pub status: Option<String>,
    /// Close timestamp (RFC 3339).
    #[serde(default)]
    pub close_time: Option<String>,
    /// Expiration timestamp (RFC 3339), used when close_time is absent.
    #[serde(default)]
    pub expiration_time: Option<String>,
    /// Total traded volume in contracts.
    #[serde(default)]
    pub volume: i64,
}

impl Market {
    /// Close time with expiration-time fallback; empty strings count as
    /// absent.
    pub fn effective_close_time(&self) -> Option<&str> {
        non_empty(&self.close_time).or_else(|| non_empty(&self.expiration_time))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// One page of the markets-list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketsPage {
    /// Markets on this page.
    #[serde(default)]
    pub markets: Vec<Market>,
    /// Pagination cursor; absent or empty when the listing is exhausted.
    #[serde(default)]
    pub cursor: Option<String>,
}

impl MarketsPage {
    /// Cursor usable for a follow-up request, if pagination continues.
    pub fn next_cursor(&self) -> Option<&str> {
        self.cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// Query parameters for the markets-list endpoint.
#[derive(Debug, Clone)]
pub struct MarketsQuery {
    /// Series the markets must belong to.
    pub series_ticker: String,
    /// Lifecycle status filter.
    pub status: MarketStatus,
    /// Page size.
    pub limit: u32,
    /// Earliest close time, Unix seconds.
    pub min_close_ts: Option<i64>,
    /// Latest close time, Unix seconds.
    pub max_close_ts: Option<i64>,
    /// Cursor from the previous page.
    pub cursor: Option<String>,
}

impl MarketsQuery {
    /// Render the query as request parameters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("status", self.status.to_string()),
            ("series_ticker", self.series_ticker.clone()),
        ];
        if let Some(min) = self.min_close_ts {
            params.push(("min_close_ts", min.to_string()));
        }
        if let Some(max) = self.max_close_ts {
            params.push(("max_close_ts", max.to_string()));
        }
        if let Some(cursor) = &self.cursor {
            params.push(("cursor", cursor.clone()));
        }
        params
    }
}

/// A single executed trade from the trades endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeRecord {
    /// Execution timestamp (RFC 3339).
    #[serde(default)]
    pub created_time: Option<String>,
    /// Yes price in integer cents (0-100).
    #[serde(default)]
    pub yes_price: Option<i64>,
}

/// One page of the trades endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TradesPage {
    /// Trades on this page.
    #[serde(default)]
    pub trades: Vec<TradeRecord>,
    /// Pagination cursor; unused by the window extractor, which caps results
    /// with a single request.
    #[serde(default)]
    pub cursor: Option<String>,
}

/// Query parameters for the trades endpoint.
#[derive(Debug, Clone)]
pub struct TradesQuery {
    /// Market the trades belong to.
    pub ticker: String,
    /// Window start, Unix seconds, inclusive.
    pub min_ts: i64,
    /// Window end, Unix seconds, inclusive.
    pub max_ts: i64,
    /// Result cap for the request.
    pub limit: u32,
}

impl TradesQuery {
    /// Render the query as request parameters.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ticker", self.ticker.clone()),
            ("min_ts", self.min_ts.to_string()),
            ("max_ts", self.max_ts.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Envelope around the market-detail endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketDetailResponse {
    /// The wrapped detail record; defaults to an empty record if absent.
    #[serde(default)]
    pub market: MarketDetail,
}

/// Settlement details for a single market.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketDetail {
    /// Final result string; empty until the market settles.
    #[serde(default)]
    pub result: Option<String>,
    /// Last traded price in cents.
    #[serde(default)]
    pub last_price: Option<i64>,
    /// Best resting yes bid in cents.
    #[serde(default)]
    pub yes_bid: Option<i64>,
    /// Best resting yes ask in cents.
    #[serde(default)]
    pub yes_ask: Option<i64>,
    /// Settlement value in cents.
    #[serde(default)]
    pub settlement_value: Option<i64>,
}

impl MarketDetail {
    /// Result string if present and non-empty.
    pub fn settled_result(&self) -> Option<&str> {
        self.result.as_deref().filter(|r| !r.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn settlement_result_parses_case_insensitively() {
        assert_eq!(
            SettlementResult::from_str("yes").unwrap(),
            SettlementResult::Yes
        );
        assert_eq!(
            SettlementResult::from_str("YES").unwrap(),
            SettlementResult::Yes
        );
        assert_eq!(
            SettlementResult::from_str("No").unwrap(),
            SettlementResult::No
        );
        assert!(SettlementResult::from_str("").is_err());
        assert!(SettlementResult::from_str("void").is_err());
    }

    #[test]
    fn market_status_renders_lowercase() {
        assert_eq!(MarketStatus::Settled.to_string(), "settled");
        assert_eq!(MarketStatus::Active.to_string(), "active");
    }

    #[test]
    fn effective_close_time_prefers_close_over_expiration() {
        let market = Market {
            ticker: "KXBTCD-25NOV1417-T100249.99".to_string(),
            status: None,
            close_time: Some("2025-11-14T17:00:00Z".to_string()),
            expiration_time: Some("2025-11-14T18:00:00Z".to_string()),
            volume: 10,
        };
        assert_eq!(market.effective_close_time(), Some("2025-11-14T17:00:00Z"));
    }

    #[test]
    fn effective_close_time_skips_empty_strings() {
        let market = Market {
            ticker: "KXBTCD-25NOV1417-T100249.99".to_string(),
            status: None,
            close_time: Some(String::new()),
            expiration_time: Some("2025-11-14T18:00:00Z".to_string()),
            volume: 0,
        };
        assert_eq!(market.effective_close_time(), Some("2025-11-14T18:00:00Z"));

        let bare = Market {
            ticker: "KXBTCD-25NOV1417-T100249.99".to_string(),
            status: None,
            close_time: None,
            expiration_time: None,
            volume: 0,
        };
        assert_eq!(bare.effective_close_time(), None);
    }

    #[test]
    fn markets_page_cursor_handling() {
        let page = MarketsPage {
            markets: vec![],
            cursor: Some("abc123".to_string()),
        };
        assert_eq!(page.next_cursor(), Some("abc123"));

        let done = MarketsPage {
            markets: vec![],
            cursor: Some(String::new()),
        };
        assert_eq!(done.next_cursor(), None);

        let missing = MarketsPage {
            markets: vec![],
            cursor: None,
        };
        assert_eq!(missing.next_cursor(), None);
    }

    #[test]
    fn market_deserializes_with_defaults() {
        let market: Market = serde_json::from_value(serde_json::json!({
            "ticker": "KXBTCD-25NOV1417-T100249.99",
            "unknown_field": true
        }))
        .unwrap();
        assert_eq!(market.ticker, "KXBTCD-25NOV1417-T100249.99");
        assert_eq!(market.volume, 0);
        assert!(market.close_time.is_none());
    }

    #[test]
    fn trades_page_deserializes_partial_trades() {
        let page: TradesPage = serde_json::from_value(serde_json::json!({
            "trades": [
                {"created_time": "2025-11-14T16:50:00Z", "yes_price": 55},
                {"yes_price": 60},
                {"created_time": "2025-11-14T16:59:00Z"}
            ]
        }))
        .unwrap();
        assert_eq!(page.trades.len(), 3);
        assert_eq!(page.trades[0].yes_price, Some(55));
        assert!(page.trades[1].created_time.is_none());
        assert!(page.trades[2].yes_price.is_none());
    }

    #[test]
    fn detail_envelope_defaults_when_market_missing() {
        let response: MarketDetailResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.market.result.is_none());
        assert!(response.market.settled_result().is_none());

        let settled: MarketDetailResponse = serde_json::from_value(serde_json::json!({
            "market": {"result": "yes", "last_price": 97, "settlement_value": 100}
        }))
        .unwrap();
        assert_eq!(settled.market.settled_result(), Some("yes"));
        assert_eq!(settled.market.last_price, Some(97));
    }

    #[test]
    fn empty_result_is_not_settled() {
        let detail = MarketDetail {
            result: Some(String::new()),
            ..MarketDetail::default()
        };
        assert!(detail.settled_result().is_none());
    }

    #[test]
    fn markets_query_renders_all_params() {
        let query = MarketsQuery {
            series_ticker: "KXBTCD".to_string(),
            status: MarketStatus::Settled,
            limit: 200,
            min_close_ts: Some(1_700_000_000),
            max_close_ts: Some(1_700_432_000),
            cursor: Some("next".to_string()),
        };
        let params = query.to_params();
        assert!(params.contains(&("limit", "200".to_string())));
        assert!(params.contains(&("status", "settled".to_string())));
        assert!(params.contains(&("series_ticker", "KXBTCD".to_string())));
        assert!(params.contains(&("min_close_ts", "1700000000".to_string())));
        assert!(params.contains(&("cursor", "next".to_string())));
    }

    #[test]
    fn markets_query_omits_absent_bounds() {
        let query = MarketsQuery {
            series_ticker: "KXBTCD".to_string(),
            status: MarketStatus::Settled,
            limit: 200,
            min_close_ts: None,
            max_close_ts: None,
            cursor: None,
        };
        let params = query.to_params();
        assert_eq!(params.len(), 3);
    }
}

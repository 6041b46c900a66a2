//! Market module for the Kalshi hourly BTC series.
//!
//! This module handles:
//! - Wire types for markets, trades, and settlement details
//! - The authenticated Kalshi API client
//! - Discovery of settled markets (cursor pagination)
//! - Event grouping and strike selection

pub mod client;
pub mod discovery;
pub mod grouping;
pub mod types;

pub use client::KalshiClient;
pub use discovery::{discover_settled_markets, filter_series_markets, CloseWindow};
pub use grouping::{event_ticker, group_by_event, select_top_strikes, EventGroup};
pub use types::{
    parse_timestamp, Market, MarketDetail, MarketStatus, MarketsPage, MarketsQuery,
    SettlementResult, TradeRecord, TradesPage, TradesQuery,
};

//! Discovery of settled markets in the hourly BTC series.

use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::pacing::MinInterval;

use super::client::KalshiClient;
use super::types::{Market, MarketStatus, MarketsPage, MarketsQuery};

/// Close-time bounds for a discovery run, both inclusive.
#[derive(Debug, Clone, Copy)]
pub struct CloseWindow {
    /// Earliest close time.
    pub min_close: Option<OffsetDateTime>,
    /// Latest close time.
    pub max_close: Option<OffsetDateTime>,
}

impl CloseWindow {
    /// Window covering the trailing `days` days up to `now`: from midnight
    /// UTC of the start day through the last second of `now`'s day.
    pub fn trailing_days(days: i64, now: OffsetDateTime) -> Self {
        let start = (now - Duration::days(days)).date().midnight().assume_utc();
        let end = now.date().midnight().assume_utc() + Duration::days(1) - Duration::seconds(1);
        Self {
            min_close: Some(start),
            max_close: Some(end),
        }
    }

    /// Bounds as Unix seconds for query parameters.
    pub fn to_bounds(&self) -> (Option<i64>, Option<i64>) {
        (
            self.min_close.map(|t| t.unix_timestamp()),
            self.max_close.map(|t| t.unix_timestamp()),
        )
    }
}

/// Fetch all settled markets of the configured series inside the close
/// window, in discovery order.
///
/// Pages through the listing until the server stops returning a cursor. A
/// failed page fetch stops pagination and keeps what was already
/// accumulated, so a first-page failure yields an empty list.
pub async fn discover_settled_markets(
    client: &KalshiClient,
    config: &Config,
    window: &CloseWindow,
    pacer: &mut MinInterval,
) -> Vec<Market> {
    let (min_close_ts, max_close_ts) = window.to_bounds();
    let mut query = MarketsQuery {
        series_ticker: config.series_ticker.clone(),
        status: MarketStatus::Settled,
        limit: config.page_limit,
        min_close_ts,
        max_close_ts,
        cursor: None,
    };

    let mut discovered: Vec<Market> = Vec::new();
    let mut pages = 0usize;

    loop {
        pacer.pace().await;

        let page = match client.markets_page(&query).await {
            Ok(page) => page,
            Err(error) => {
                warn!(%error, pages, "market listing page failed, stopping pagination");
                break;
            }
        };

        pages += 1;
        let (kept, next_cursor) = consume_page(page, &config.series_ticker);
        debug!(page = pages, kept = kept.len(), "discovery page processed");
        discovered.extend(kept);

        match next_cursor {
            Some(cursor) => query.cursor = Some(cursor),
            None => break,
        }
    }

    info!(
        markets = discovered.len(),
        pages, "settled market discovery complete"
    );
    discovered
}

/// Split one listing page into the markets kept by the series filter and
/// the cursor for the follow-up request. The cursor is captured before the
/// page's markets are consumed.
fn consume_page(page: MarketsPage, series_ticker: &str) -> (Vec<Market>, Option<String>) {
    let next_cursor = page.next_cursor().map(str::to_string);
    let kept = filter_series_markets(page.markets, series_ticker);
    (kept, next_cursor)
}

/// Re-apply the series filter to page results: keep only markets whose
/// ticker starts with `"{series}-"`.
pub fn filter_series_markets(markets: Vec<Market>, series_ticker: &str) -> Vec<Market> {
    let prefix = format!("{series_ticker}-");
    markets
        .into_iter()
        .filter(|m| m.ticker.starts_with(&prefix))
        .collect()
}

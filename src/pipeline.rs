//! End-to-end collection pipeline.

use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::dataset::{ResultRow, RunContext};
use crate::error::{ApiError, Result};
use crate::market::{
    discover_settled_markets, group_by_event, parse_timestamp, select_top_strikes, CloseWindow,
    KalshiClient, Market, MarketDetail,
};
use crate::pacing::MinInterval;
use crate::snapshots::reconstruct_preclose;

/// Counters reported after a collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Markets returned by discovery.
    pub markets_discovered: usize,
    /// Distinct events among them.
    pub events: usize,
    /// Strikes selected for analysis.
    pub strikes_selected: usize,
    /// Rows written to the output file.
    pub rows_written: usize,
    /// Selected strikes that produced no row.
    pub markets_skipped: usize,
}

/// Run the whole collection: discovery, grouping, per-strike analysis, and
/// the final flush.
///
/// Upstream failures are matched where they happen and degrade to skips;
/// only output-file errors propagate.
pub async fn run_collection(
    client: &KalshiClient,
    config: &Config,
    window: &CloseWindow,
    context: &RunContext,
) -> Result<RunSummary> {
    let mut page_pacer = MinInterval::new(config.page_delay());
    let mut market_pacer = MinInterval::new(config.market_delay());

    let markets = discover_settled_markets(client, config, window, &mut page_pacer).await;
    let mut summary = RunSummary {
        markets_discovered: markets.len(),
        ..RunSummary::default()
    };

    let groups = group_by_event(markets);
    summary.events = groups.len();
    info!(events = summary.events, "grouped discovered markets");

    for group in &groups {
        let strikes = select_top_strikes(group, config.strikes_per_event);
        if strikes.is_empty() {
            debug!(event = %group.event_ticker, "no strikes with volume, skipping event");
            continue;
        }
        summary.strikes_selected += strikes.len();
        info!(
            event = %group.event_ticker,
            strikes = strikes.len(),
            "analyzing event"
        );

        for market in &strikes {
            market_pacer.pace().await;

            match analyze_market(client, config, &group.event_ticker, market).await {
                Some(row) => context.push(row),
                None => summary.markets_skipped += 1,
            }
        }
    }

    // The flush is unconditional: a zero-row run still truncates the
    // output file.
    summary.rows_written = context.flush()?;
    if summary.rows_written == 0 {
        info!("no rows collected");
    } else {
        for row in context.rows().iter().take(5) {
            info!(
                ticker = %row.ticker,
                result = %row.result,
                result_binary = row.result_binary,
                snapshots = row.snapshots_in_window,
                "collected row"
            );
        }
    }

    Ok(summary)
}

/// Analyze one selected strike: gate on close time, fetch and gate on the
/// settlement detail, reconstruct the pre-close window, assemble the row.
async fn analyze_market(
    client: &KalshiClient,
    config: &Config,
    event_ticker: &str,
    market: &Market,
) -> Option<ResultRow> {
    debug!(ticker = %market.ticker, volume = market.volume, "analyzing strike");

    let (close_raw, close) = close_gate(market)?;
    let detail = client.market_detail(&market.ticker).await;
    let (result, last_price) = result_gate(&market.ticker, detail)?;
    let checkpoints = reconstruct_preclose(client, &market.ticker, close, config.trades_limit).await;

    Some(ResultRow::assemble(
        market,
        event_ticker,
        &close_raw,
        &result,
        last_price,
        checkpoints,
    ))
}

/// Close-time gate: the raw string and its parsed instant, or `None` when
/// the market has no usable close time.
fn close_gate(market: &Market) -> Option<(String, OffsetDateTime)> {
    let Some(close_raw) = market.effective_close_time() else {
        warn!(ticker = %market.ticker, "market has no close time, skipping");
        return None;
    };

    match parse_timestamp(close_raw) {
        Ok(close) => Some((close_raw.to_string(), close)),
        Err(error) => {
            warn!(%error, ticker = %market.ticker, close_raw, "unparseable close time, skipping");
            None
        }
    }
}

/// Settlement gate: the result string and last price out of a detail fetch,
/// or `None` when the fetch failed or the market is not yet resolvable.
fn result_gate(
    ticker: &str,
    detail: std::result::Result<MarketDetail, ApiError>,
) -> Option<(String, Option<i64>)> {
    let detail = match detail {
        Ok(detail) => detail,
        Err(error) => {
            warn!(%error, ticker, "market detail fetch failed, skipping");
            return None;
        }
    };

    match detail.settled_result() {
        Some(result) => Some((result.to_string(), detail.last_price)),
        None => {
            debug!(ticker, "no settlement result yet, skipping");
            None
        }
    }
}

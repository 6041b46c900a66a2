//! Pre-settlement checkpoint reconstruction.

use rust_decimal::Decimal;
use time::{Duration, OffsetDateTime};

use crate::market::KalshiClient;

use super::window::{fetch_window_snapshots, PriceSnapshot};

/// Lead times before close at which prices are sampled, in minutes.
pub const CHECKPOINT_LEAD_MINUTES: [i64; 4] = [15, 10, 5, 1];

/// Span of the reconstruction window before close, in minutes.
pub const WINDOW_MINUTES: i64 = 15;

/// Checkpoint prices reconstructed from a market's final pre-close window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckpointPrices {
    /// Price nearest to 15 minutes before close.
    pub price_15min: Decimal,
    /// Price nearest to 10 minutes before close.
    pub price_10min: Decimal,
    /// Price nearest to 5 minutes before close.
    pub price_5min: Decimal,
    /// Price nearest to 1 minute before close.
    pub price_1min: Decimal,
    /// Snapshots observed in the window.
    pub snapshots_in_window: u32,
}

/// Target instants for the four checkpoints of a close time.
pub fn checkpoint_targets(close: OffsetDateTime) -> [OffsetDateTime; 4] {
    CHECKPOINT_LEAD_MINUTES.map(|lead| close - Duration::minutes(lead))
}

/// Snapshot closest in time to `target`; the first minimum in list order
/// wins ties.
pub fn nearest_snapshot(
    snapshots: &[PriceSnapshot],
    target: OffsetDateTime,
) -> Option<&PriceSnapshot> {
    let mut best: Option<(&PriceSnapshot, Duration)> = None;
    for snapshot in snapshots {
        let delta = (snapshot.ts - target).abs();
        match best {
            Some((_, best_delta)) if delta >= best_delta => {}
            _ => best = Some((snapshot, delta)),
        }
    }
    best.map(|(snapshot, _)| snapshot)
}

/// Resolve the four checkpoints from a window's snapshots.
///
/// `None` when the window holds no snapshots; otherwise every checkpoint
/// carries the probability of its nearest snapshot. One snapshot may serve
/// several checkpoints in thin markets.
pub fn resolve_checkpoints(
    snapshots: &[PriceSnapshot],
    close: OffsetDateTime,
) -> Option<CheckpointPrices> {
    if snapshots.is_empty() {
        return None;
    }

    let [t15, t10, t5, t1] = checkpoint_targets(close);
    let price_at =
        |target: OffsetDateTime| nearest_snapshot(snapshots, target).map(|s| s.probability);

    Some(CheckpointPrices {
        price_15min: price_at(t15)?,
        price_10min: price_at(t10)?,
        price_5min: price_at(t5)?,
        price_1min: price_at(t1)?,
        snapshots_in_window: snapshots.len() as u32,
    })
}

/// Reconstruct the final pre-close pricing of a market.
///
/// Fetches the `[close - 15 min, close]` trade window and resolves the
/// checkpoints; `None` when no usable trades fall in the window.
pub async fn reconstruct_preclose(
    client: &KalshiClient,
    ticker: &str,
    close: OffsetDateTime,
    trades_limit: u32,
) -> Option<CheckpointPrices> {
    let start = close - Duration::minutes(WINDOW_MINUTES);
    let snapshots = fetch_window_snapshots(client, ticker, start, close, trades_limit).await;
    resolve_checkpoints(&snapshots, close)
}

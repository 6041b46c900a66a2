//! Final pre-close price reconstruction.
//!
//! This module handles:
//! - Trade-window retrieval and conversion into price snapshots
//! - Fixed lead-time checkpoints resolved to nearest-in-time trades

pub mod checkpoints;
pub mod window;

pub use checkpoints::{
    checkpoint_targets, nearest_snapshot, reconstruct_preclose, resolve_checkpoints,
    CheckpointPrices, CHECKPOINT_LEAD_MINUTES, WINDOW_MINUTES,
};
pub use window::{
    cents_to_probability, fetch_window_snapshots, snapshots_from_trades, PriceSnapshot,
};

//! Historical data collector for Kalshi hourly Bitcoin markets.
//!
//! This library rebuilds the pre-close trading picture of every settled
//! market in an hourly series: the probabilities the market held at
//! 15/10/5/1 minutes before close, paired with the final settlement.
//!
//! # Pipeline
//!
//! ```text
//! discover settled markets   (cursor pagination over GET /markets)
//!          │
//! group by event, keep the top strikes by volume
//!          │
//! per strike: settlement detail + trades in [close - 15 min, close]
//!          │
//! nearest-trade checkpoints at 15/10/5/1 minutes before close
//!          │
//! one CSV row per strike
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`market`]: Kalshi client, market discovery, event grouping
//! - [`snapshots`]: Trade windows and pre-close checkpoints
//! - [`dataset`]: Output rows and the run context
//! - [`pipeline`]: The end-to-end collection run
//! - [`pacing`]: Minimum spacing between requests
//! - [`utils`]: Utility functions

pub mod config;
pub mod dataset;
pub mod error;
pub mod market;
pub mod pacing;
pub mod pipeline;
pub mod snapshots;
pub mod utils;

pub use config::Config;
pub use error::{CollectorError, Result};

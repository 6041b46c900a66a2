//! Event grouping and strike selection.

use std::collections::HashMap;

use super::types::Market;

/// Substring separating the event prefix from the strike suffix in a ticker.
pub const STRIKE_DELIMITER: &str = "-T";

/// Event key for a market ticker: the prefix before the first strike
/// delimiter, or the whole ticker when no delimiter is present.
pub fn event_ticker(market_ticker: &str) -> &str {
    match market_ticker.split_once(STRIKE_DELIMITER) {
        Some((prefix, _)) => prefix,
        None => market_ticker,
    }
}

/// Markets of one event, in discovery order.
#[derive(Debug, Clone)]
pub struct EventGroup {
    /// Event ticker shared by the strikes.
    pub event_ticker: String,
    /// Strike markets in discovery order.
    pub markets: Vec<Market>,
}

/// Group markets by event key, preserving first-seen order of distinct
/// events.
pub fn group_by_event(markets: Vec<Market>) -> Vec<EventGroup> {
    let mut groups: Vec<EventGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for market in markets {
        let key = event_ticker(&market.ticker).to_string();
        match index.get(&key) {
            Some(&at) => groups[at].markets.push(market),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(EventGroup {
                    event_ticker: key,
                    markets: vec![market],
                });
            }
        }
    }

    groups
}

/// Select the highest-volume strikes of an event.
///
/// Markets without positive volume are excluded; the rest are ordered by
/// volume descending (stable, so discovery order breaks ties) and capped at
/// `max_strikes`.
pub fn select_top_strikes(group: &EventGroup, max_strikes: usize) -> Vec<Market> {
    let mut liquid: Vec<Market> = group
        .markets
        .iter()
        .filter(|m| m.volume > 0)
        .cloned()
        .collect();
    liquid.sort_by(|a, b| b.volume.cmp(&a.volume));
    liquid.truncate(max_strikes);
    liquid
}

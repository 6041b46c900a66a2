//! Application configuration loaded from environment variables.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Kalshi Credentials ===
    /// API key id used as the bearer credential. Required.
    pub kalshi_api_key_id: String,

    // === API Endpoint ===
    /// Trade API base URL.
    #[serde(default = "default_base_url")]
    pub kalshi_api_base_url: String,

    // === Market Selection ===
    /// Series ticker of the hourly BTC market family.
    #[serde(default = "default_series_ticker")]
    pub series_ticker: String,

    /// Trailing analysis window in days when no explicit bounds are given.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    // === Paging & Limits ===
    /// Page size for market discovery.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Result cap for a single trade-window request.
    #[serde(default = "default_trades_limit")]
    pub trades_limit: u32,

    /// Maximum strikes analyzed per event, highest volume first.
    #[serde(default = "default_strikes_per_event")]
    pub strikes_per_event: usize,

    // === Request Pacing ===
    /// Minimum milliseconds between discovery page requests.
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Minimum milliseconds between per-market request rounds.
    #[serde(default = "default_market_delay_ms")]
    pub market_delay_ms: u64,

    // === Output ===
    /// Destination CSV path, truncated on every run.
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

fn default_base_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}

fn default_series_ticker() -> String {
    "KXBTCD".to_string()
}

fn default_lookback_days() -> i64 {
    5
}

fn default_page_limit() -> u32 {
    200
}

fn default_trades_limit() -> u32 {
    1000
}

fn default_strikes_per_event() -> usize {
    5
}

fn default_page_delay_ms() -> u64 {
    500
}

fn default_market_delay_ms() -> u64 {
    200
}

fn default_output_file() -> String {
    "bitcoin_hourly_analysis.csv".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.kalshi_api_key_id.is_empty() {
            return Err("KALSHI_API_KEY_ID is required".to_string());
        }

        if !self.kalshi_api_base_url.starts_with("http") {
            return Err("KALSHI_API_BASE_URL must be an http(s) URL".to_string());
        }

        if self.page_limit == 0 {
            return Err("PAGE_LIMIT must be positive".to_string());
        }

        if self.trades_limit == 0 {
            return Err("TRADES_LIMIT must be positive".to_string());
        }

        if self.strikes_per_event == 0 {
            return Err("STRIKES_PER_EVENT must be positive".to_string());
        }

        if self.lookback_days <= 0 {
            return Err("LOOKBACK_DAYS must be positive".to_string());
        }

        Ok(())
    }

    /// Minimum interval between discovery page requests.
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    /// Minimum interval between per-market request rounds.
    pub fn market_delay(&self) -> Duration {
        Duration::from_millis(self.market_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            kalshi_api_key_id: "test-key-id".to_string(),
            kalshi_api_base_url: default_base_url(),
            series_ticker: default_series_ticker(),
            lookback_days: default_lookback_days(),
            page_limit: default_page_limit(),
            trades_limit: default_trades_limit(),
            strikes_per_event: default_strikes_per_event(),
            page_delay_ms: default_page_delay_ms(),
            market_delay_ms: default_market_delay_ms(),
            output_file: default_output_file(),
        }
    }

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_page_limit(), 200);
        assert_eq!(default_trades_limit(), 1000);
        assert_eq!(default_strikes_per_event(), 5);
        assert_eq!(default_lookback_days(), 5);
        assert_eq!(default_series_ticker(), "KXBTCD");
        assert_eq!(default_output_file(), "bitcoin_hourly_analysis.csv");
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let mut config = test_config();
        config.kalshi_api_key_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_base_url() {
        let mut config = test_config();
        config.kalshi_api_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let mut config = test_config();
        config.page_limit = 0;
        assert!(config.validate().is_err());

        let mut config = test_config();
        config.strikes_per_event = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn pacing_helpers_reflect_millis() {
        let config = test_config();
        assert_eq!(config.page_delay(), Duration::from_millis(500));
        assert_eq!(config.market_delay(), Duration::from_millis(200));
    }
}

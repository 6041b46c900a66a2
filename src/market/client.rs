//! Kalshi trade API client wrapper.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::Config;
use crate::error::ApiError;

use super::types::{
    MarketDetail, MarketDetailResponse, MarketsPage, MarketsQuery, TradesPage, TradesQuery,
};

/// Kalshi trade API client.
///
/// Issues bearer-authenticated GET requests and decodes typed responses.
/// Failures come back as [`ApiError`] values for the caller to match on;
/// nothing here retries or panics on a bad response.
#[derive(Debug, Clone)]
pub struct KalshiClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Trade API base URL, no trailing slash.
    base_url: String,
}

impl KalshiClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.kalshi_api_key_id))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: config.kalshi_api_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of the markets listing.
    #[instrument(skip(self, query))]
    pub async fn markets_page(&self, query: &MarketsQuery) -> Result<MarketsPage, ApiError> {
        self.get("/markets", &query.to_params()).await
    }

    /// Fetch the detail record for a single market.
    #[instrument(skip(self), fields(ticker = %ticker))]
    pub async fn market_detail(&self, ticker: &str) -> Result<MarketDetail, ApiError> {
        let path = format!("/markets/{ticker}");
        let response: MarketDetailResponse = self.get(&path, &[]).await?;
        Ok(response.market)
    }

    /// Fetch trades for a market inside a time window.
    #[instrument(skip(self, query), fields(ticker = %query.ticker))]
    pub async fn trades_page(&self, query: &TradesQuery) -> Result<TradesPage, ApiError> {
        self.get("/markets/trades", &query.to_params()).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).query(params).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::Status {
                path: path.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

// REST client for the upstream historical candles endpoint.
use super::BarSource;
use crate::config::settings::UpstreamSettings;
use crate::error::EngineError;
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::utils::format_date;
use std::time::Duration;

/// Fetches daily candles over HTTP:
/// `GET {base_url}/historical/candles/{symbol}?from=YYYY-MM-DD&to=YYYY-MM-DD`.
pub struct HttpBarSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpBarSource {
    pub fn new(settings: &UpstreamSettings) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| EngineError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn candles_url(&self, symbol: &str) -> String {
        format!("{}/historical/candles/{}", self.base_url, symbol)
    }
}

#[async_trait]
impl BarSource for HttpBarSource {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<serde_json::Value, EngineError> {
        let mut request = self
            .client
            .get(self.candles_url(symbol))
            .query(&[("from", format_date(from)), ("to", format_date(to))]);
        if let Some(key) = &self.api_key {
            request = request.header("X-API-KEY", key);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| EngineError::UpstreamFetchError(format!("Request for {} failed: {}", symbol, e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(EngineError::UpstreamFetchError(format!("HTTP {} for {}", status, symbol)));
        }

        resp.json::<serde_json::Value>()
            .await
            .map_err(|e| EngineError::MalformedResponse(format!("Failed to decode response for {}: {}", symbol, e)))
    }
}

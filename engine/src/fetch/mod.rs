//! Upstream bar source abstraction.
//!
//! The range fetcher only sees the [`BarSource`] trait, so the real provider
//! client can be swapped for a test double. Sources hand back the provider's
//! raw payload; [`parse_candles_payload`] decides whether it is usable.

pub mod http;
pub mod segments;

pub use http::HttpBarSource;
pub use segments::{plan_segments, Segment, DEFAULT_MAX_SEGMENT_DAYS, MAX_SEGMENT_DAYS_LIMIT};

use crate::error::EngineError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::Bar;

/// A provider of daily bars for a bounded date span.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Fetches the raw candles payload for `[from, to]`, expected to look like
    /// `{"data": [{"date": "...", "open": ..., ...}, ...]}`.
    async fn fetch(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<serde_json::Value, EngineError>;
}

#[derive(Debug, Deserialize)]
struct CandlesPayload {
    #[serde(default)]
    data: Option<Vec<Bar>>,
}

/// Converts a raw candles payload into bars.
///
/// A missing, null or empty `data` array is an empty segment. Anything else
/// that does not match the expected shape rejects the whole payload.
pub fn parse_candles_payload(payload: serde_json::Value) -> Result<Vec<Bar>, EngineError> {
    if !payload.is_object() {
        return Err(EngineError::MalformedResponse(format!("expected a JSON object, got: {}", payload)));
    }
    let parsed: CandlesPayload =
        serde_json::from_value(payload).map_err(|e| EngineError::MalformedResponse(e.to_string()))?;
    Ok(parsed.data.unwrap_or_default())
}

//! Cache-first range lookup.
//!
//! ```text
//! get_range(symbol, from, to)
//!         │
//!   validate ──────────────▶ Failure
//!         │
//!   read history, filter [from, to]
//!         │
//!   any rows? ── yes ──▶ derive ──▶ Bars(Cache)
//!         │ no
//!   plan ≤365-day segments, fetch each in order (failures skipped)
//!         │
//!   any rows? ── no ──▶ Empty
//!         │ yes
//!   merge_and_persist raw rows, derive ──▶ Bars(Upstream)
//! ```
//!
//! A cache hit on any overlapping row short-circuits the fetch, even when the
//! cached rows only cover part of the requested range.

use crate::data::derived::with_derived_fields;
use crate::data::history_store::{merge_bars, HistoryStore};
use crate::error::EngineError;
use crate::fetch::{parse_candles_payload, plan_segments, BarSource, Segment, DEFAULT_MAX_SEGMENT_DAYS};
use chrono::NaiveDate;
use shared::models::{Bar, DateRange};
use shared::utils::validate_symbol;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Where the returned bars came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarOrigin {
    Cache,
    Upstream,
}

/// Tagged result of a range query.
#[derive(Debug, Clone, PartialEq)]
pub enum RangeOutcome {
    /// Rows found, newest first, with derived fields.
    Bars { bars: Vec<Bar>, origin: BarOrigin },
    /// Nothing cached and nothing returned upstream for the range.
    Empty,
    /// Validation error or unexpected internal fault.
    Failure { reason: String },
}

impl RangeOutcome {
    fn failure(err: EngineError) -> Self {
        RangeOutcome::Failure { reason: err.to_string() }
    }
}

pub struct RangeFetcher<S: BarSource> {
    store: HistoryStore,
    source: Arc<S>,
    max_segment_days: i64,
}

impl<S: BarSource + 'static> RangeFetcher<S> {
    pub fn new(store: HistoryStore, source: Arc<S>) -> Self {
        Self {
            store,
            source,
            max_segment_days: DEFAULT_MAX_SEGMENT_DAYS,
        }
    }

    pub fn with_max_segment_days(mut self, days: i64) -> Self {
        self.max_segment_days = days;
        self
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Full stored history for `symbol`, newest first, with derived fields.
    #[instrument(skip(self))]
    pub async fn history(&self, symbol: &str) -> Result<Option<Vec<Bar>>, EngineError> {
        validate_symbol(symbol).map_err(|e| EngineError::ValidationError(e.to_string()))?;
        let bars = self.read_history(symbol).await?;
        Ok(bars.map(with_derived_fields))
    }

    /// Returns the bars for `[from, to]`, from the cache when any cached row
    /// falls in the range, otherwise from the upstream source.
    #[instrument(skip(self))]
    pub async fn get_range(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> RangeOutcome {
        match self.try_get_range(symbol, from, to).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Range query failed");
                RangeOutcome::failure(e)
            }
        }
    }

    async fn try_get_range(&self, symbol: &str, from: NaiveDate, to: NaiveDate) -> Result<RangeOutcome, EngineError> {
        validate_symbol(symbol).map_err(|e| EngineError::ValidationError(e.to_string()))?;
        if from > to {
            return Err(EngineError::ValidationError(format!(
                "from_date {} is after to_date {}",
                from, to
            )));
        }
        let range = DateRange { from, to };

        if let Some(history) = self.read_history(symbol).await? {
            let cached: Vec<Bar> = history.into_iter().filter(|b| range.contains(b.date)).collect();
            if !cached.is_empty() {
                info!(symbol = %symbol, rows = cached.len(), "Serving range from local history");
                return Ok(RangeOutcome::Bars {
                    bars: with_derived_fields(cached),
                    origin: BarOrigin::Cache,
                });
            }
        }

        let collected = self.fetch_segments(symbol, range).await?;
        if collected.is_empty() {
            info!(symbol = %symbol, "No data available upstream for range");
            return Ok(RangeOutcome::Empty);
        }

        // Persist the raw rows; derived columns are filled in on the way out.
        if let Err(e) = self.persist(symbol, collected.clone()).await {
            warn!(symbol = %symbol, error = %e, "Fetched rows were not cached");
        }

        let bars = with_derived_fields(merge_bars(Vec::new(), collected));
        info!(symbol = %symbol, rows = bars.len(), "Serving range from upstream");
        Ok(RangeOutcome::Bars { bars, origin: BarOrigin::Upstream })
    }

    /// Fetches every segment of `range` in order. A failed, malformed or
    /// empty segment is logged and skipped. A panicking source is an
    /// internal fault and aborts the whole query.
    async fn fetch_segments(&self, symbol: &str, range: DateRange) -> Result<Vec<Bar>, EngineError> {
        let segments = plan_segments(range.from, range.to, self.max_segment_days);
        debug!(
            symbol = %symbol,
            span_days = range.span_days(),
            segments = segments.len(),
            source = self.source.name(),
            "Fetching from upstream"
        );

        let mut collected = Vec::new();
        for segment in segments {
            info!(symbol = %symbol, from = %segment.from, to = %segment.to, "Fetching segment");
            let bars = match self.fetch_segment(symbol, segment).await? {
                Ok(payload) => parse_candles_payload(payload),
                Err(e) => Err(e),
            };
            match bars {
                Ok(bars) if bars.is_empty() => {
                    warn!(symbol = %symbol, from = %segment.from, to = %segment.to, "Segment returned no data");
                }
                Ok(bars) => {
                    info!(symbol = %symbol, rows = bars.len(), "Segment fetched");
                    collected.extend(bars);
                }
                Err(e) => {
                    warn!(symbol = %symbol, from = %segment.from, to = %segment.to, error = %e, "Segment fetch failed, skipping");
                }
            }
        }
        Ok(collected)
    }

    /// Runs one upstream request on its own task. The outer error is a
    /// crashed task, the inner one an ordinary fetch failure.
    async fn fetch_segment(
        &self,
        symbol: &str,
        segment: Segment,
    ) -> Result<Result<serde_json::Value, EngineError>, EngineError> {
        let source = Arc::clone(&self.source);
        let symbol = symbol.to_string();
        tokio::spawn(async move { source.fetch(&symbol, segment.from, segment.to).await })
            .await
            .map_err(|e| EngineError::InternalError(format!("Upstream fetch task failed: {}", e)))
    }

    async fn read_history(&self, symbol: &str) -> Result<Option<Vec<Bar>>, EngineError> {
        let store = self.store.clone();
        let symbol = symbol.to_string();
        tokio::task::spawn_blocking(move || store.read(&symbol))
            .await
            .map_err(|e| EngineError::InternalError(format!("History read task failed: {}", e)))
    }

    async fn persist(&self, symbol: &str, bars: Vec<Bar>) -> Result<usize, EngineError> {
        let store = self.store.clone();
        let symbol = symbol.to_string();
        tokio::task::spawn_blocking(move || store.merge_and_persist(&symbol, bars))
            .await
            .map_err(|e| EngineError::InternalError(format!("History write task failed: {}", e)))?
    }
}

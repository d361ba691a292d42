// engine/src/services/market_cache_service/mod.rs
// The MarketCache gRPC service: request logging here, handlers in sibling modules.

use super::{HistoryRequest, HistoryResponse, MarketCache, RangeRequest, RangeResponse};
use crate::fetch::BarSource;
use crate::services::range_fetch::RangeFetcher;
use crate::services::symbol_locks::SymbolLocks;
use tonic::{Request, Response, Status};

pub mod get_history;
pub mod get_range;
pub mod helpers;

pub struct MarketCacheEngine<S: BarSource> {
    fetcher: RangeFetcher<S>,
    locks: SymbolLocks,
}

impl<S: BarSource> MarketCacheEngine<S> {
    pub fn new(fetcher: RangeFetcher<S>) -> Self {
        MarketCacheEngine {
            fetcher,
            locks: SymbolLocks::new(),
        }
    }
}

#[tonic::async_trait]
impl<S: BarSource + 'static> MarketCache for MarketCacheEngine<S> {
    async fn get_history(&self, request: Request<HistoryRequest>) -> Result<Response<HistoryResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(symbol = %req_payload.symbol, "Received GetHistoryRequest");
        get_history::handle_get_history(req_payload, &self.fetcher).await
    }

    async fn get_range(&self, request: Request<RangeRequest>) -> Result<Response<RangeResponse>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            symbol = %req_payload.symbol,
            from_date = %req_payload.from_date,
            to_date = %req_payload.to_date,
            "Received GetRangeRequest"
        );
        get_range::handle_get_range(req_payload, &self.fetcher, &self.locks).await
    }
}

// Query surface and orchestration for the bar cache.

// Generated from proto/market_cache.proto by build.rs.
pub mod pb {
    tonic::include_proto!("market_cache");
}

pub mod market_cache_service;
pub mod range_fetch;
pub mod symbol_locks;

pub use pb::market_cache_server::{MarketCache, MarketCacheServer};
pub use pb::{
    Bar as ProtoBar, HistoryRequest, HistoryResponse, RangeOutcome as ProtoRangeOutcome, RangeRequest,
    RangeResponse,
};

// Handler for the GetHistory RPC
use tonic::{Response, Status};

use super::helpers::to_proto_bar;
use crate::fetch::BarSource;
use crate::services::range_fetch::RangeFetcher;
use crate::services::{HistoryRequest, HistoryResponse};

pub async fn handle_get_history<S: BarSource + 'static>(
    req_payload: HistoryRequest,
    fetcher: &RangeFetcher<S>,
) -> Result<Response<HistoryResponse>, Status> {
    let symbol = req_payload.symbol.trim();

    match fetcher.history(symbol).await? {
        Some(bars) => {
            tracing::debug!(symbol = %symbol, count = bars.len(), "Returning stored history");
            Ok(Response::new(HistoryResponse {
                found: true,
                message: format!("Loaded {} stored bars for {}", bars.len(), symbol),
                bars: bars.iter().map(to_proto_bar).collect(),
            }))
        }
        None => {
            tracing::debug!(symbol = %symbol, "No stored history");
            Ok(Response::new(HistoryResponse {
                found: false,
                bars: vec![],
                message: format!("No stored data for symbol {}", symbol),
            }))
        }
    }
}

// Handler for the GetRange RPC
use tonic::{Response, Status};

use super::helpers::{parse_request_date, to_proto_bar};
use crate::error::EngineError;
use crate::fetch::BarSource;
use crate::services::range_fetch::{BarOrigin, RangeFetcher, RangeOutcome};
use crate::services::symbol_locks::SymbolLocks;
use crate::services::{ProtoRangeOutcome, RangeRequest, RangeResponse};
use shared::utils::validate_symbol;

pub async fn handle_get_range<S: BarSource + 'static>(
    req_payload: RangeRequest,
    fetcher: &RangeFetcher<S>,
    locks: &SymbolLocks,
) -> Result<Response<RangeResponse>, Status> {
    let symbol = req_payload.symbol.trim().to_string();

    let dates = validate_symbol(&symbol)
        .map_err(|e| EngineError::ValidationError(e.to_string()))
        .and_then(|_| parse_request_date("from_date", &req_payload.from_date))
        .and_then(|from| parse_request_date("to_date", &req_payload.to_date).map(|to| (from, to)));
    let (from, to) = match dates {
        Ok(dates) => dates,
        Err(e) => return Ok(Response::new(failure_response(e))),
    };

    // A cache miss ends in a merge-write; one per symbol at a time.
    let _guard = locks.acquire(&symbol).await;
    let outcome = fetcher.get_range(&symbol, from, to).await;

    let response = match outcome {
        RangeOutcome::Bars { bars, origin } => {
            let source = match origin {
                BarOrigin::Cache => "local history",
                BarOrigin::Upstream => "upstream",
            };
            RangeResponse {
                outcome: ProtoRangeOutcome::Success as i32,
                message: format!(
                    "Fetched {} bars for {} from {} to {} ({})",
                    bars.len(),
                    symbol,
                    req_payload.from_date,
                    req_payload.to_date,
                    source
                ),
                bars: bars.iter().map(to_proto_bar).collect(),
            }
        }
        RangeOutcome::Empty => RangeResponse {
            outcome: ProtoRangeOutcome::Empty as i32,
            bars: vec![],
            message: format!(
                "No data available for {} from {} to {}",
                symbol, req_payload.from_date, req_payload.to_date
            ),
        },
        RangeOutcome::Failure { reason } => RangeResponse {
            outcome: ProtoRangeOutcome::Failure as i32,
            bars: vec![],
            message: reason,
        },
    };
    Ok(Response::new(response))
}

fn failure_response(err: EngineError) -> RangeResponse {
    tracing::warn!(error = %err, "Rejected GetRange request");
    RangeResponse {
        outcome: ProtoRangeOutcome::Failure as i32,
        bars: vec![],
        message: err.to_string(),
    }
}

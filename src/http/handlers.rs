//! Route handlers.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    BoxError, Json,
};
use serde_json::{json, Value};
use std::time::Instant;

use crate::etherscan::UpstreamError;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::lookup::{self, TransactionDetails, WalletSummary};
use crate::observability::metrics;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let body = Json(json!({
        "status": "ok",
        "message": "Ethereum Explorer API is running",
        "api_key_loaded": state.etherscan.has_api_key(),
        "chain_id": state.etherscan.chain_id(),
        "version": env!("CARGO_PKG_VERSION"),
    }));
    respond("health", start, Ok(body))
}

/// `GET /api/wallet/{address}`: upstream balance payload, unmodified.
pub async fn wallet(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let start = Instant::now();
    respond("wallet", start, wallet_raw(&state, &raw).await)
}

/// `GET /api/wallet/{address}/summary`
pub async fn wallet_summary(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let start = Instant::now();
    respond("wallet_summary", start, wallet_summarized(&state, &raw).await)
}

/// `GET /api/transaction/{tx_hash}`: upstream transaction payload, unmodified.
pub async fn transaction(State(state): State<AppState>, Path(raw): Path<String>) -> Response {
    let start = Instant::now();
    respond("transaction", start, transaction_raw(&state, &raw).await)
}

/// `GET /api/transaction/{tx_hash}/details`
pub async fn transaction_details(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Response {
    let start = Instant::now();
    respond("transaction_details", start, transaction_decoded(&state, &raw).await)
}

/// JSON 404 for unknown routes.
pub async fn not_found() -> Response {
    ApiError::NotFound("No such endpoint.".to_string()).into_response()
}

async fn wallet_raw(state: &AppState, raw: &str) -> Result<Json<Value>, ApiError> {
    let address = lookup::parse_address(raw)?;
    let body = lookup::wallet::wallet_balance(&state.etherscan, address).await?;
    Ok(Json(body))
}

async fn wallet_summarized(state: &AppState, raw: &str) -> Result<Json<WalletSummary>, ApiError> {
    let address = lookup::parse_address(raw)?;
    let summary =
        lookup::wallet::wallet_summary(&state.etherscan, &state.config.upstream, address).await?;
    Ok(Json(summary))
}

async fn transaction_raw(state: &AppState, raw: &str) -> Result<Json<Value>, ApiError> {
    let hash = lookup::parse_tx_hash(raw)?;
    lookup::transaction::transaction_raw(&state.etherscan, hash)
        .await?
        .map(Json)
        .ok_or_else(tx_not_found)
}

async fn transaction_decoded(
    state: &AppState,
    raw: &str,
) -> Result<Json<TransactionDetails>, ApiError> {
    let hash = lookup::parse_tx_hash(raw)?;
    lookup::transaction::transaction_details(&state.etherscan, hash)
        .await?
        .map(Json)
        .ok_or_else(tx_not_found)
}

/// Map an error raised by the request timeout layer onto the envelope.
pub fn middleware_error(err: BoxError, request_secs: u64) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!(limit_secs = request_secs, "Request exceeded time limit");
        ApiError::Upstream(UpstreamError::Timeout(request_secs))
    } else {
        ApiError::Internal(err.to_string())
    }
}

fn tx_not_found() -> ApiError {
    ApiError::NotFound("Transaction not found.".to_string())
}

/// Turn a handler result into a response and record it.
fn respond<T: IntoResponse>(endpoint: &str, start: Instant, result: Result<T, ApiError>) -> Response {
    let response = match result {
        Ok(body) => body.into_response(),
        Err(e) => {
            if e.status().is_server_error() {
                tracing::warn!(endpoint, code = e.code(), error = %e, "Lookup failed");
            } else {
                tracing::debug!(endpoint, code = e.code(), "Request rejected");
            }
            e.into_response()
        }
    };
    metrics::record_request(endpoint, response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_elapsed_maps_to_upstream_timeout() {
        let err: BoxError = Box::new(tower::timeout::error::Elapsed::new());
        let api_error = middleware_error(err, 60);
        assert_eq!(api_error.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(api_error.code(), "upstream_timeout");
    }

    #[test]
    fn test_other_layer_errors_are_internal() {
        let err: BoxError = "layer failed".into();
        let api_error = middleware_error(err, 60);
        assert_eq!(api_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.code(), "internal");
    }
}

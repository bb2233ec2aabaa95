//! Error envelope and status mapping.
//!
//! Every failure leaves the proxy as
//! `{"error": "<message>", "code": "<machine code>", "status": <u16>}`.
//!
//! | class          | code                 | status |
//! |----------------|----------------------|--------|
//! | invalid input  | `invalid_address`    | 400    |
//! | invalid input  | `invalid_tx_hash`    | 400    |
//! | not found      | `not_found`          | 404    |
//! | rate limited   | `rate_limited`       | 429    |
//! | upstream       | `upstream_error`     | 502    |
//! | upstream       | `upstream_malformed` | 502    |
//! | upstream       | `upstream_rejected`  | 502    |
//! | upstream       | `upstream_timeout`   | 504    |

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::etherscan::UpstreamError;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid address format. Must be 42 characters starting with 0x.")]
    InvalidAddress,

    #[error("Invalid transaction hash. Must be 66 characters starting with 0x.")]
    InvalidTxHash,

    #[error("{0}")]
    NotFound(String),

    #[error("Rate limit exceeded. Try again in {retry_after_secs} seconds.")]
    RateLimited { retry_after_secs: u64 },

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidAddress | ApiError::InvalidTxHash => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Upstream(UpstreamError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidAddress => "invalid_address",
            ApiError::InvalidTxHash => "invalid_tx_hash",
            ApiError::NotFound(_) => "not_found",
            ApiError::RateLimited { .. } => "rate_limited",
            ApiError::Upstream(UpstreamError::Timeout(_)) => "upstream_timeout",
            ApiError::Upstream(UpstreamError::Malformed(_)) => "upstream_malformed",
            ApiError::Upstream(UpstreamError::Rejected(_)) => "upstream_rejected",
            ApiError::Upstream(_) => "upstream_error",
            ApiError::Internal(_) => "internal",
        }
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            code: self.code().to_string(),
            status: status.as_u16(),
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimited { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}

//! Upstream error definitions and payload envelope checks.
//!
//! Etherscan answers in two shapes:
//! - account/contract modules: `{"status": "1"|"0", "message": .., "result": ..}`
//! - proxy module (JSON-RPC): `{"jsonrpc": "2.0", "id": .., "result": ..}` or
//!   `{"jsonrpc": "2.0", "id": .., "error": {"code": .., "message": ..}}`
//!
//! Some failures (an invalid API key, for instance) come back in the first
//! shape even from the proxy module.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while talking to Etherscan.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    /// The call did not complete within the configured timeout.
    #[error("upstream timed out after {0} seconds")]
    Timeout(u64),

    /// Connection or protocol failure.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("upstream returned HTTP {0}")]
    Status(u16),

    /// Body is not JSON or lacks the expected fields.
    #[error("upstream returned a malformed payload: {0}")]
    Malformed(String),

    /// Etherscan answered but reported an error.
    #[error("upstream rejected the request: {0}")]
    Rejected(String),
}

impl UpstreamError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Status(_) => "status",
            UpstreamError::Malformed(_) => "malformed",
            UpstreamError::Rejected(_) => "rejected",
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Check an account/contract module payload.
///
/// `status: "1"` passes. `status: "0"` with an empty array result is the
/// "No transactions found" answer and also passes. Anything else with
/// `status: "0"` is a rejection.
pub fn check_account_envelope(body: Value) -> UpstreamResult<Value> {
    let status = body
        .get("status")
        .and_then(Value::as_str)
        .ok_or_else(|| UpstreamError::Malformed("missing 'status' field".to_string()))?;

    match status {
        "1" => {
            if body.get("result").is_none() {
                return Err(UpstreamError::Malformed("missing 'result' field".to_string()));
            }
            Ok(body)
        }
        "0" => {
            if matches!(body.get("result"), Some(Value::Array(items)) if items.is_empty()) {
                return Ok(body);
            }
            Err(UpstreamError::Rejected(rejection_message(&body)))
        }
        other => Err(UpstreamError::Malformed(format!("unexpected status '{}'", other))),
    }
}

/// Check a proxy module (JSON-RPC) payload.
///
/// A `null` result is allowed here; callers decide whether that means
/// "not found" or "pending".
pub fn check_rpc_envelope(body: Value) -> UpstreamResult<Value> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown JSON-RPC error");
        return Err(UpstreamError::Rejected(message.to_string()));
    }

    if body.get("status").and_then(Value::as_str) == Some("0") {
        return Err(UpstreamError::Rejected(rejection_message(&body)));
    }

    match body.get("result") {
        Some(Value::Null) | Some(Value::Object(_)) => Ok(body),
        Some(_) => Err(UpstreamError::Malformed("'result' is not an object".to_string())),
        None => Err(UpstreamError::Malformed("missing 'result' field".to_string())),
    }
}

/// Build a readable message from a `status: "0"` payload.
fn rejection_message(body: &Value) -> String {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("NOTOK");
    match body.get("result").and_then(Value::as_str) {
        Some(detail) if !detail.is_empty() => format!("{}: {}", message, detail),
        _ => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_envelope_ok() {
        let body = json!({"status": "1", "message": "OK", "result": "1000"});
        assert_eq!(check_account_envelope(body.clone()).unwrap(), body);
    }

    #[test]
    fn test_account_envelope_empty_list_is_ok() {
        let body = json!({"status": "0", "message": "No transactions found", "result": []});
        assert!(check_account_envelope(body).is_ok());
    }

    #[test]
    fn test_account_envelope_rejection() {
        let body = json!({"status": "0", "message": "NOTOK", "result": "Invalid API Key"});
        assert_eq!(
            check_account_envelope(body).unwrap_err(),
            UpstreamError::Rejected("NOTOK: Invalid API Key".to_string())
        );
    }

    #[test]
    fn test_account_envelope_malformed() {
        let err = check_account_envelope(json!({"result": "1"})).unwrap_err();
        assert_eq!(err.kind(), "malformed");

        let err = check_account_envelope(json!({"status": "1"})).unwrap_err();
        assert_eq!(err.kind(), "malformed");
    }

    #[test]
    fn test_rpc_envelope() {
        let found = json!({"jsonrpc": "2.0", "id": 1, "result": {"hash": "0xab"}});
        assert!(check_rpc_envelope(found).is_ok());

        let missing = json!({"jsonrpc": "2.0", "id": 1, "result": null});
        assert!(check_rpc_envelope(missing).is_ok());

        let error = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32602, "message": "invalid argument"}});
        assert_eq!(
            check_rpc_envelope(error).unwrap_err(),
            UpstreamError::Rejected("invalid argument".to_string())
        );

        let key = json!({"status": "0", "message": "NOTOK", "result": "Missing/Invalid API Key"});
        assert_eq!(check_rpc_envelope(key).unwrap_err().kind(), "rejected");

        let odd = json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"});
        assert_eq!(check_rpc_envelope(odd).unwrap_err().kind(), "malformed");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            UpstreamError::Timeout(10).to_string(),
            "upstream timed out after 10 seconds"
        );
        assert_eq!(UpstreamError::Status(503).to_string(), "upstream returned HTTP 503");
    }
}

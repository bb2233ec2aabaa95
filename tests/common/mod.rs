//! Shared utilities for integration tests: a mock Etherscan and a proxy
//! launcher.

#![allow(dead_code)]

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use explorer_proxy::{HttpServer, ProxyConfig, Shutdown};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

pub const KNOWN_ADDRESS: &str = "0xd8da6bf26964af9d7eed9e03e53415d37aa96045";
pub const KNOWN_BALANCE_WEI: &str = "1500000000000000000";
pub const KNOWN_TX: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";
pub const UNKNOWN_TX: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

/// Answers `status: "0"` (e.g. upstream key throttled).
pub const REJECTED_ADDRESS: &str = "0x00000000000000000000000000000000000000aa";
/// Answers HTTP 503.
pub const UNAVAILABLE_ADDRESS: &str = "0x00000000000000000000000000000000000000bb";
/// Answers an HTML page.
pub const GARBLED_ADDRESS: &str = "0x00000000000000000000000000000000000000cc";
/// Answers after 3 seconds.
pub const SLOW_ADDRESS: &str = "0x00000000000000000000000000000000000000dd";

pub const TEST_API_KEY: &str = "test-key";

#[derive(Clone, Default)]
struct MockState {
    calls: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// A running mock Etherscan.
pub struct MockEtherscan {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockEtherscan {
    pub fn url(&self) -> String {
        format!("http://{}/v2/api", self.addr)
    }

    pub fn call_count(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<HashMap<String, String>> {
        self.state.queries.lock().unwrap().clone()
    }
}

/// Start a mock Etherscan on an ephemeral port.
pub async fn start_mock_etherscan() -> MockEtherscan {
    let state = MockState::default();
    let app = Router::new()
        .route("/v2/api", get(handle))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockEtherscan { addr, state }
}

async fn handle(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state.queries.lock().unwrap().push(query.clone());

    let address = query
        .get("address")
        .map(|a| a.to_lowercase())
        .unwrap_or_default();

    match address.as_str() {
        SLOW_ADDRESS => tokio::time::sleep(Duration::from_secs(3)).await,
        UNAVAILABLE_ADDRESS => {
            return (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response()
        }
        GARBLED_ADDRESS => return (StatusCode::OK, "<html>maintenance</html>").into_response(),
        REJECTED_ADDRESS => {
            return Json(json!({
                "status": "0",
                "message": "NOTOK",
                "result": "Max calls per sec rate limit reached (5/sec)"
            }))
            .into_response()
        }
        _ => {}
    }

    let action = query.get("action").map(String::as_str).unwrap_or_default();
    Json(payload(action, &query)).into_response()
}

fn payload(action: &str, query: &HashMap<String, String>) -> Value {
    let txhash = query.get("txhash").map(String::as_str).unwrap_or_default();
    match action {
        "balance" => json!({"status": "1", "message": "OK", "result": KNOWN_BALANCE_WEI}),
        "getsourcecode" => json!({
            "status": "1",
            "message": "OK",
            "result": [{"SourceCode": "", "ContractName": ""}]
        }),
        "txlist" => json!({
            "status": "1",
            "message": "OK",
            "result": [{
                "hash": KNOWN_TX,
                "from": KNOWN_ADDRESS,
                "to": "0x5df9b87991262f6ba471f09758cde1c0fc1de734",
                "value": "250000000000000000",
                "blockNumber": "19000000",
                "timeStamp": "1700000000"
            }]
        }),
        "tokenbalance" => {
            let usdc = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
            let contract = query
                .get("contractaddress")
                .map(|c| c.to_lowercase())
                .unwrap_or_default();
            let result = if contract == usdc { "2500000" } else { "0" };
            json!({"status": "1", "message": "OK", "result": result})
        }
        "eth_getTransactionByHash" if txhash == KNOWN_TX => json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "hash": KNOWN_TX,
                "from": "0xa1e4380a3b1f749673e270229993ee55f35663b4",
                "to": "0x5df9b87991262f6ba471f09758cde1c0fc1de734",
                "value": "0xde0b6b3a7640000",
                "gas": "0x5208",
                "gasPrice": "0x2d79883d2000",
                "blockNumber": "0xb443",
                "input": "0x"
            }
        }),
        "eth_getTransactionByHash" => json!({"jsonrpc": "2.0", "id": 1, "result": null}),
        "eth_getTransactionReceipt" => json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {"status": "0x1", "gasUsed": "0x5208"}
        }),
        _ => json!({"status": "0", "message": "NOTOK", "result": "Error! Unknown action"}),
    }
}

/// Proxy configuration pointed at `upstream_url`, without pacing or rate limits.
pub fn test_config(upstream_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = upstream_url.to_string();
    config.upstream.api_key = Some(TEST_API_KEY.to_string());
    config.upstream.min_interval_ms = Some(0);
    config.upstream.timeout_secs = 1;
    config.rate_limit.enabled = false;
    config
}

/// Start the proxy on an ephemeral port.
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// HTTP client that ignores proxy environment variables.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

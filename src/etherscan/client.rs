//! Etherscan v2 HTTP client with pacing, timeout and error classification.
//!
//! # Responsibilities
//! - Attach `chainid` and the server-held API key to every call
//! - Space outbound calls according to the configured pacing interval
//! - Map transport, HTTP and payload failures onto [`UpstreamError`]
//! - Never leak the API key into logs or errors

use alloy::primitives::{Address, TxHash};
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::UpstreamConfig;
use crate::etherscan::pacer::Pacer;
use crate::etherscan::types::{
    check_account_envelope, check_rpc_envelope, UpstreamError, UpstreamResult,
};
use crate::observability::metrics;

/// Etherscan client shared by all handlers.
#[derive(Clone)]
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: url::Url,
    api_key: Option<String>,
    chain_id: u64,
    timeout_secs: u64,
    pacer: Arc<Pacer>,
}

impl EtherscanClient {
    /// Build a client from configuration.
    pub fn new(config: &UpstreamConfig) -> UpstreamResult<Self> {
        let base_url = url::Url::parse(&config.base_url).map_err(|e| {
            UpstreamError::Transport(format!("invalid base URL '{}': {}", config.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("explorer-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        let pacer = Arc::new(Pacer::new(Duration::from_millis(config.pacing_interval_ms())));

        tracing::info!(
            base_url = %base_url,
            chain_id = config.chain_id,
            api_key_loaded = config.has_api_key(),
            pacing_ms = pacer.interval().as_millis() as u64,
            "Etherscan client initialized"
        );

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            chain_id: config.chain_id,
            timeout_secs: config.timeout_secs,
            pacer,
        })
    }

    /// Whether calls carry an API key.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Chain ID sent with every call.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// ETH balance in wei (`module=account&action=balance`).
    ///
    /// Returns the upstream payload unmodified after checking that `result`
    /// is a decimal wei string.
    pub async fn account_balance(&self, address: Address) -> UpstreamResult<Value> {
        let body = self
            .call(&[
                ("module", "account".to_string()),
                ("action", "balance".to_string()),
                ("address", address.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;
        let body = check_account_envelope(body)?;
        require_decimal_result(&body)?;
        Ok(body)
    }

    /// Verified source metadata (`module=contract&action=getsourcecode`).
    pub async fn source_code(&self, address: Address) -> UpstreamResult<Value> {
        let body = self
            .call(&[
                ("module", "contract".to_string()),
                ("action", "getsourcecode".to_string()),
                ("address", address.to_string()),
            ])
            .await?;
        check_account_envelope(body)
    }

    /// Most recent normal transactions, newest first.
    pub async fn tx_list(&self, address: Address, limit: u32) -> UpstreamResult<Value> {
        let body = self
            .call(&[
                ("module", "account".to_string()),
                ("action", "txlist".to_string()),
                ("address", address.to_string()),
                ("sort", "desc".to_string()),
                ("page", "1".to_string()),
                ("offset", limit.to_string()),
            ])
            .await?;
        check_account_envelope(body)
    }

    /// ERC-20 balance in the token's smallest unit.
    pub async fn token_balance(&self, token: Address, holder: Address) -> UpstreamResult<Value> {
        let body = self
            .call(&[
                ("module", "account".to_string()),
                ("action", "tokenbalance".to_string()),
                ("contractaddress", token.to_string()),
                ("address", holder.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;
        let body = check_account_envelope(body)?;
        require_decimal_result(&body)?;
        Ok(body)
    }

    /// `eth_getTransactionByHash` through the proxy module.
    pub async fn transaction_by_hash(&self, hash: TxHash) -> UpstreamResult<Value> {
        let body = self
            .call(&[
                ("module", "proxy".to_string()),
                ("action", "eth_getTransactionByHash".to_string()),
                ("txhash", hash.to_string()),
            ])
            .await?;
        check_rpc_envelope(body)
    }

    /// `eth_getTransactionReceipt` through the proxy module.
    pub async fn transaction_receipt(&self, hash: TxHash) -> UpstreamResult<Value> {
        let body = self
            .call(&[
                ("module", "proxy".to_string()),
                ("action", "eth_getTransactionReceipt".to_string()),
                ("txhash", hash.to_string()),
            ])
            .await?;
        check_rpc_envelope(body)
    }

    /// Issue one paced GET and decode the JSON body.
    async fn call(&self, params: &[(&str, String)]) -> UpstreamResult<Value> {
        let action = params
            .iter()
            .find(|(k, _)| *k == "action")
            .map(|(_, v)| v.as_str())
            .unwrap_or("unknown")
            .to_string();

        self.pacer.wait().await;

        let mut query: Vec<(&str, String)> = params.to_vec();
        query.push(("chainid", self.chain_id.to_string()));
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.clone()));
        }

        let start = Instant::now();
        let result = self.send(&query).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::record_upstream_call(&action, outcome, start);

        match &result {
            Ok(_) => tracing::debug!(action = %action, elapsed = ?start.elapsed(), "Upstream call completed"),
            Err(e) => tracing::warn!(action = %action, error = %e, "Upstream call failed"),
        }
        result
    }

    async fn send(&self, query: &[(&str, String)]) -> UpstreamResult<Value> {
        let response = self
            .http
            .get(self.base_url.clone())
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| UpstreamError::Malformed(format!("invalid JSON: {}", e)))
    }

    /// Strip the URL (it carries the API key) and classify the failure.
    fn classify(&self, error: reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            UpstreamError::Timeout(self.timeout_secs)
        } else {
            UpstreamError::Transport(error.without_url().to_string())
        }
    }
}

/// Require `result` to be a non-empty string of ASCII digits.
fn require_decimal_result(body: &Value) -> UpstreamResult<()> {
    match body.get("result").and_then(Value::as_str) {
        Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Ok(()),
        _ => Err(UpstreamError::Malformed(
            "'result' is not a decimal amount".to_string(),
        )),
    }
}

impl std::fmt::Debug for EtherscanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EtherscanClient")
            .field("base_url", &self.base_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("api_key_loaded", &self.api_key.is_some())
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

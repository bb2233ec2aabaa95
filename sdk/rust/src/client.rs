use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error envelope returned by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub error: String,
    pub code: String,
    pub status: u16,
}

#[derive(Debug, Error)]
pub enum SdkError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered with its error envelope.
    #[error("proxy returned {} ({}): {}", .0.status, .0.code, .0.error)]
    Api(ErrorEnvelope),

    /// The proxy answered with something that is not JSON.
    #[error("unexpected response {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
}

impl SdkError {
    /// Machine-readable code when the proxy sent an envelope.
    pub fn code(&self) -> Option<&str> {
        match self {
            SdkError::Api(envelope) => Some(&envelope.code),
            _ => None,
        }
    }
}

pub struct ExplorerClient {
    client: Client,
    proxy_url: String,
}

impl ExplorerClient {
    pub fn new(proxy_url: &str) -> Self {
        Self::with_client(Client::new(), proxy_url)
    }

    /// Use a preconfigured reqwest client (timeouts, proxies).
    pub fn with_client(client: Client, proxy_url: &str) -> Self {
        Self {
            client,
            proxy_url: proxy_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<Value, SdkError> {
        self.get("/health").await
    }

    /// Raw Etherscan balance payload.
    pub async fn wallet(&self, address: &str) -> Result<Value, SdkError> {
        self.get(&format!("/api/wallet/{}", address)).await
    }

    pub async fn wallet_summary(&self, address: &str) -> Result<Value, SdkError> {
        self.get(&format!("/api/wallet/{}/summary", address)).await
    }

    /// Raw Etherscan `eth_getTransactionByHash` payload.
    pub async fn transaction(&self, hash: &str) -> Result<Value, SdkError> {
        self.get(&format!("/api/transaction/{}", hash)).await
    }

    pub async fn transaction_details(&self, hash: &str) -> Result<Value, SdkError> {
        self.get(&format!("/api/transaction/{}/details", hash)).await
    }

    async fn get(&self, path: &str) -> Result<Value, SdkError> {
        let resp = self
            .client
            .get(format!("{}{}", self.proxy_url, path))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(match serde_json::from_str::<ErrorEnvelope>(&text) {
                Ok(envelope) => SdkError::Api(envelope),
                Err(_) => SdkError::Unexpected { status, body: text },
            });
        }

        serde_json::from_str(&text).map_err(|_| SdkError::Unexpected { status, body: text })
    }
}

//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Public Etherscan v2 endpoint.
pub const DEFAULT_UPSTREAM_URL: &str = "https://api.etherscan.io/v2/api";

/// Root configuration for the explorer proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Etherscan upstream settings.
    pub upstream: UpstreamConfig,

    /// Per-client rate limiting.
    pub rate_limit: RateLimitConfig,

    /// Cross-origin policy for the frontend.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Static frontend serving.
    pub frontend: FrontendConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Apply deployment overrides from the environment.
    ///
    /// `ETHERSCAN_APIKEY` replaces the configured key and `PORT` rebinds the
    /// listener to `0.0.0.0:$PORT`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            if !key.trim().is_empty() {
                self.upstream.api_key = Some(key.trim().to_string());
            }
        }
        if let Ok(port) = std::env::var(PORT_ENV_VAR) {
            if let Ok(port) = port.trim().parse::<u16>() {
                self.listener.bind_address = format!("0.0.0.0:{}", port);
            } else {
                tracing::warn!(value = %port, "Ignoring non-numeric PORT");
            }
        }
    }
}

/// Environment variable holding the Etherscan API key.
pub const API_KEY_ENV_VAR: &str = "ETHERSCAN_APIKEY";

/// Environment variable holding the listen port (set by hosting platforms).
pub const PORT_ENV_VAR: &str = "PORT";

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Etherscan upstream configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the Etherscan v2 API.
    pub base_url: String,

    /// Server-held API key. Never sent to clients or logged.
    pub api_key: Option<String>,

    /// Chain ID sent with every call (1 = Ethereum mainnet).
    pub chain_id: u64,

    /// Per-call timeout in seconds.
    pub timeout_secs: u64,

    /// Minimum spacing between outbound calls in milliseconds.
    /// When unset, 200 ms with an API key and 5000 ms without.
    pub min_interval_ms: Option<u64>,

    /// Number of recent transactions in a wallet summary.
    pub recent_tx_limit: u32,

    /// ERC-20 tokens checked in a wallet summary.
    pub tokens: Vec<TokenConfig>,
}

impl UpstreamConfig {
    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Effective pacing interval between outbound calls.
    pub fn pacing_interval_ms(&self) -> u64 {
        match self.min_interval_ms {
            Some(ms) => ms,
            None if self.has_api_key() => 200,
            None => 5000,
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("chain_id", &self.chain_id)
            .field("timeout_secs", &self.timeout_secs)
            .field("min_interval_ms", &self.min_interval_ms)
            .field("recent_tx_limit", &self.recent_tx_limit)
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: None,
            chain_id: 1,
            timeout_secs: 10,
            min_interval_ms: None,
            recent_tx_limit: 10,
            tokens: default_tokens(),
        }
    }
}

/// An ERC-20 token checked for balances.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenConfig {
    /// Display symbol (e.g., "USDC").
    pub symbol: String,

    /// Token contract address.
    pub address: String,

    /// Token decimals (default: 18).
    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_decimals() -> u8 {
    18
}

fn default_tokens() -> Vec<TokenConfig> {
    [
        ("USDC", "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6),
        ("DAI", "0x6B175474E89094C44Da98b954EedeAC495271d0F", 18),
        ("WETH", "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", 18),
        ("UNI", "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", 18),
    ]
    .into_iter()
    .map(|(symbol, address, decimals)| TokenConfig {
        symbol: symbol.to_string(),
        address: address.to_string(),
        decimals,
    })
    .collect()
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Maximum requests per client within one window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,

    /// Key clients by the first X-Forwarded-For entry instead of the peer IP.
    pub trust_forwarded_for: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 30,
            window_secs: 60,
            trust_forwarded_for: false,
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed frontend origins (e.g., "https://example.com").
    /// Empty or containing "*" allows any origin.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    /// Whether the policy allows every origin.
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Static frontend configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FrontendConfig {
    /// Directory served at `/`. Unset disables static serving.
    pub static_dir: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

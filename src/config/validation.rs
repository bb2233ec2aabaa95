//! Configuration validation.
//!
//! Serde handles syntax; this module checks values make sense together.
//! All problems are collected rather than stopping at the first.

use std::net::SocketAddr;
use std::str::FromStr;

use alloy::primitives::Address;
use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("upstream.base_url '{0}' is not an http(s) URL")]
    UpstreamUrl(String),

    #[error("upstream.{0} must be greater than zero")]
    Zero(&'static str),

    #[error("upstream.recent_tx_limit {0} exceeds 100")]
    TxLimit(u32),

    #[error("token '{symbol}' has invalid address '{address}'")]
    TokenAddress { symbol: String, address: String },

    #[error("token '{symbol}' decimals {decimals} exceeds 77")]
    TokenDecimals { symbol: String, decimals: u8 },

    #[error("rate_limit.{0} must be greater than zero")]
    RateLimit(&'static str),

    #[error("cors origin '{0}' is not a valid origin")]
    CorsOrigin(String),

    #[error("timeouts.request_secs must be greater than zero")]
    RequestTimeout,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    match url::Url::parse(&config.upstream.base_url) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
        _ => errors.push(ValidationError::UpstreamUrl(config.upstream.base_url.clone())),
    }

    if config.upstream.chain_id == 0 {
        errors.push(ValidationError::Zero("chain_id"));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::Zero("timeout_secs"));
    }
    if config.upstream.recent_tx_limit == 0 {
        errors.push(ValidationError::Zero("recent_tx_limit"));
    } else if config.upstream.recent_tx_limit > 100 {
        errors.push(ValidationError::TxLimit(config.upstream.recent_tx_limit));
    }

    for token in &config.upstream.tokens {
        if !token.address.starts_with("0x") || Address::from_str(&token.address).is_err() {
            errors.push(ValidationError::TokenAddress {
                symbol: token.symbol.clone(),
                address: token.address.clone(),
            });
        }
        // 10^78 overflows U256
        if token.decimals > 77 {
            errors.push(ValidationError::TokenDecimals {
                symbol: token.symbol.clone(),
                decimals: token.decimals,
            });
        }
    }

    if config.rate_limit.enabled {
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::RateLimit("max_requests"));
        }
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::RateLimit("window_secs"));
        }
    }

    for origin in &config.cors.allowed_origins {
        if origin == "*" {
            continue;
        }
        let parsed = url::Url::parse(origin).ok();
        let has_host = parsed.as_ref().and_then(|u| u.host_str()).is_some();
        if !has_host || HeaderValue::from_str(origin).is_err() {
            errors.push(ValidationError::CorsOrigin(origin.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::RequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

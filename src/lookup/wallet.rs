//! Wallet lookups.
//!
//! The raw lookup relays the single balance call. The summary combines the
//! balance, contract check, recent transactions and token balances into one
//! display payload; only the balance call is required, the rest degrade to
//! empty values when Etherscan fails them.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::{TokenConfig, UpstreamConfig};
use crate::etherscan::{EtherscanClient, UpstreamError, UpstreamResult};
use crate::lookup::units::{parse_decimal, round_to, scale};

/// Decimals of ETH.
const ETH_DECIMALS: u8 = 18;

/// Display summary of a wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletSummary {
    pub address: String,
    pub eth_balance: f64,
    pub is_contract: bool,
    pub transactions: Vec<TxSummary>,
    /// Token symbol to positive balance, rounded to 6 places.
    pub token_balances: BTreeMap<String, f64>,
}

/// One row of the recent transaction list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TxSummary {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub value_eth: f64,
    pub block: Option<String>,
    pub timestamp: Option<String>,
    pub is_outgoing: bool,
}

/// Relay the balance payload for `address` unmodified.
pub async fn wallet_balance(client: &EtherscanClient, address: Address) -> UpstreamResult<Value> {
    client.account_balance(address).await
}

/// Build the wallet summary. Calls are issued one after another; the
/// client paces them anyway.
pub async fn wallet_summary(
    client: &EtherscanClient,
    config: &UpstreamConfig,
    address: Address,
) -> UpstreamResult<WalletSummary> {
    let balance = client.account_balance(address).await?;
    let eth_balance = eth_balance_from(&balance)?;

    let is_contract = match client.source_code(address).await {
        Ok(body) => is_contract_from(&body),
        Err(e) => {
            tracing::warn!(address = %address, error = %e, "Contract check failed");
            false
        }
    };

    let transactions = match client.tx_list(address, config.recent_tx_limit).await {
        Ok(body) => transactions_from(&body, address),
        Err(e) => {
            tracing::warn!(address = %address, error = %e, "Transaction list failed");
            Vec::new()
        }
    };

    let mut token_balances = BTreeMap::new();
    for token in &config.tokens {
        let Ok(token_address) = Address::from_str(&token.address) else {
            continue;
        };
        match client.token_balance(token_address, address).await {
            Ok(body) => {
                if let Some(amount) = token_amount_from(&body, token) {
                    token_balances.insert(token.symbol.clone(), amount);
                }
            }
            Err(e) => {
                tracing::warn!(token = %token.symbol, error = %e, "Token balance failed");
            }
        }
    }

    Ok(WalletSummary {
        address: address.to_string(),
        eth_balance,
        is_contract,
        transactions,
        token_balances,
    })
}

/// ETH balance from a checked balance payload.
fn eth_balance_from(body: &Value) -> UpstreamResult<f64> {
    let raw = body
        .get("result")
        .and_then(Value::as_str)
        .ok_or_else(|| UpstreamError::Malformed("balance 'result' is not a string".to_string()))?;
    Ok(scale(parse_decimal(raw)?, ETH_DECIMALS))
}

/// A verified contract has non-empty `SourceCode` in its first entry.
fn is_contract_from(body: &Value) -> bool {
    body.get("result")
        .and_then(Value::as_array)
        .and_then(|entries| entries.first())
        .and_then(|entry| entry.get("SourceCode"))
        .and_then(Value::as_str)
        .is_some_and(|code| !code.is_empty())
}

fn transactions_from(body: &Value, address: Address) -> Vec<TxSummary> {
    let Some(entries) = body.get("result").and_then(Value::as_array) else {
        return Vec::new();
    };
    let own = address.to_string().to_lowercase();

    entries
        .iter()
        .map(|tx| {
            let text = |key: &str| tx.get(key).and_then(Value::as_str).map(str::to_string);
            let from = text("from");
            let value_eth = text("value")
                .and_then(|v| parse_decimal(&v).ok())
                .map(|v| scale(v, ETH_DECIMALS))
                .unwrap_or(0.0);
            TxSummary {
                hash: text("hash"),
                is_outgoing: from.as_deref().is_some_and(|f| f.to_lowercase() == own),
                from,
                to: text("to"),
                value_eth,
                block: text("blockNumber"),
                timestamp: text("timeStamp"),
            }
        })
        .collect()
}

/// Positive token balance, scaled and rounded; `None` when zero.
fn token_amount_from(body: &Value, token: &TokenConfig) -> Option<f64> {
    let raw = body.get("result").and_then(Value::as_str)?;
    let amount = round_to(scale(parse_decimal(raw).ok()?, token.decimals), 6);
    (amount > 0.0).then_some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const OWNER: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn owner() -> Address {
        Address::from_str(OWNER).unwrap()
    }

    #[test]
    fn test_eth_balance_from() {
        let body = json!({"status": "1", "message": "OK", "result": "2500000000000000000"});
        assert_eq!(eth_balance_from(&body).unwrap(), 2.5);

        let bad = json!({"status": "1", "message": "OK", "result": 7});
        assert!(matches!(eth_balance_from(&bad), Err(UpstreamError::Malformed(_))));
    }

    #[test]
    fn test_is_contract_from() {
        let verified = json!({"status": "1", "result": [{"SourceCode": "pragma solidity ^0.8.0;"}]});
        assert!(is_contract_from(&verified));

        let eoa = json!({"status": "1", "result": [{"SourceCode": ""}]});
        assert!(!is_contract_from(&eoa));
        assert!(!is_contract_from(&json!({"status": "1", "result": []})));
    }

    #[test]
    fn test_transactions_from_marks_direction() {
        let body = json!({
            "status": "1",
            "message": "OK",
            "result": [
                {
                    "hash": "0xaaa",
                    "from": OWNER.to_lowercase(),
                    "to": "0x0000000000000000000000000000000000000001",
                    "value": "1000000000000000000",
                    "blockNumber": "19000000",
                    "timeStamp": "1700000000"
                },
                {
                    "hash": "0xbbb",
                    "from": "0x0000000000000000000000000000000000000002",
                    "to": OWNER.to_lowercase(),
                    "value": "500000000000000000",
                    "blockNumber": "18999999",
                    "timeStamp": "1699999999"
                }
            ]
        });

        let txs = transactions_from(&body, owner());
        assert_eq!(txs.len(), 2);
        assert!(txs[0].is_outgoing);
        assert_eq!(txs[0].value_eth, 1.0);
        assert_eq!(txs[0].block.as_deref(), Some("19000000"));
        assert!(!txs[1].is_outgoing);
        assert_eq!(txs[1].value_eth, 0.5);
    }

    #[test]
    fn test_transactions_from_empty() {
        let body = json!({"status": "0", "message": "No transactions found", "result": []});
        assert!(transactions_from(&body, owner()).is_empty());
    }

    #[test]
    fn test_token_amount_uses_decimals() {
        let usdc = TokenConfig {
            symbol: "USDC".into(),
            address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".into(),
            decimals: 6,
        };
        let body = json!({"status": "1", "result": "1234567891"});
        assert_eq!(token_amount_from(&body, &usdc), Some(1234.567891));

        let zero = json!({"status": "1", "result": "0"});
        assert_eq!(token_amount_from(&zero, &usdc), None);

        // Dust below the display precision is dropped.
        let dai = TokenConfig { decimals: 18, ..usdc };
        let dust = json!({"status": "1", "result": "100"});
        assert_eq!(token_amount_from(&dust, &dai), None);
    }
}

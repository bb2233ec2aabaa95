//! Transaction lookups.

use alloy::primitives::{TxHash, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::etherscan::{EtherscanClient, UpstreamResult};
use crate::lookup::units::{parse_quantity, parse_quantity_u64, scale};

/// Shown in place of `to` for contract deployments.
pub const CONTRACT_CREATION: &str = "Contract Creation";

/// Decoded transaction with receipt data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionDetails {
    pub hash: Option<String>,
    pub from: Option<String>,
    pub to: String,
    pub value_eth: f64,
    /// Exact wei value as a decimal string.
    pub value_wei: String,
    /// `None` while pending.
    pub block: Option<u64>,
    pub gas_limit: u64,
    pub gas_price_gwei: f64,
    pub input_data: String,
    /// 4-byte selector (`0x` + 8 hex) when the input carries calldata.
    pub method_id: Option<String>,
    /// `"success"` or `"failed"`; `None` without a receipt.
    pub status: Option<String>,
    pub gas_used: Option<u64>,
    pub gas_cost_eth: Option<f64>,
}

/// Relay the `eth_getTransactionByHash` payload unmodified.
///
/// `Ok(None)` means Etherscan does not know the hash.
pub async fn transaction_raw(client: &EtherscanClient, hash: TxHash) -> UpstreamResult<Option<Value>> {
    let body = client.transaction_by_hash(hash).await?;
    if body.get("result").is_some_and(Value::is_null) {
        return Ok(None);
    }
    Ok(Some(body))
}

/// Fetch the transaction and its receipt and decode both.
///
/// `Ok(None)` means Etherscan does not know the hash. A failed receipt
/// call leaves the receipt fields empty.
pub async fn transaction_details(
    client: &EtherscanClient,
    hash: TxHash,
) -> UpstreamResult<Option<TransactionDetails>> {
    let Some(body) = transaction_raw(client, hash).await? else {
        return Ok(None);
    };

    let receipt = match client.transaction_receipt(hash).await {
        Ok(r) => r.get("result").filter(|v| v.is_object()).cloned(),
        Err(e) => {
            tracing::warn!(tx_hash = %hash, error = %e, "Receipt lookup failed");
            None
        }
    };

    let tx = body.get("result").cloned().unwrap_or(Value::Null);
    decode(&tx, receipt.as_ref()).map(Some)
}

fn decode(tx: &Value, receipt: Option<&Value>) -> UpstreamResult<TransactionDetails> {
    let text = |v: &Value, key: &str| v.get(key).and_then(Value::as_str).map(str::to_string);
    let quantity = |v: &Value, key: &str| -> UpstreamResult<U256> {
        parse_quantity(v.get(key).and_then(Value::as_str).unwrap_or("0x0"))
    };

    let value_wei = quantity(tx, "value")?;
    let gas_price = quantity(tx, "gasPrice")?;
    let gas_limit = parse_quantity_u64(tx.get("gas").and_then(Value::as_str).unwrap_or("0x0"))?;
    let block = match tx.get("blockNumber").and_then(Value::as_str) {
        Some(raw) => Some(parse_quantity_u64(raw)?),
        None => None,
    };

    let input_data = text(tx, "input").unwrap_or_else(|| "0x".to_string());
    let method_id = (input_data.len() > 10)
        .then(|| input_data.get(..10).map(str::to_string))
        .flatten();

    let mut details = TransactionDetails {
        hash: text(tx, "hash"),
        from: text(tx, "from"),
        to: text(tx, "to").unwrap_or_else(|| CONTRACT_CREATION.to_string()),
        value_eth: scale(value_wei, 18),
        value_wei: value_wei.to_string(),
        block,
        gas_limit,
        gas_price_gwei: scale(gas_price, 9),
        input_data,
        method_id,
        status: None,
        gas_used: None,
        gas_cost_eth: None,
    };

    if let Some(receipt) = receipt {
        let gas_used = parse_quantity_u64(
            receipt.get("gasUsed").and_then(Value::as_str).unwrap_or("0x0"),
        )?;
        // Post-London receipts carry the price actually paid.
        let paid_price = match receipt.get("effectiveGasPrice").and_then(Value::as_str) {
            Some(raw) => parse_quantity(raw)?,
            None => gas_price,
        };
        let succeeded = receipt.get("status").and_then(Value::as_str) == Some("0x1");

        details.status = Some(if succeeded { "success" } else { "failed" }.to_string());
        details.gas_used = Some(gas_used);
        details.gas_cost_eth = Some(scale(U256::from(gas_used).saturating_mul(paid_price), 18));
    }

    Ok(details)
}

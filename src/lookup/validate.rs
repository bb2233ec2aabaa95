//! Surface validation of client-supplied identifiers.
//!
//! Runs before any upstream call; a rejection here never reaches Etherscan.

use alloy::primitives::{Address, TxHash};
use std::str::FromStr;

use crate::http::response::ApiError;

/// Length of `0x` + 40 hex digits.
pub const ADDRESS_LEN: usize = 42;

/// Length of `0x` + 64 hex digits.
pub const TX_HASH_LEN: usize = 66;

/// Parse a wallet or contract address.
pub fn parse_address(raw: &str) -> Result<Address, ApiError> {
    if !has_hex_shape(raw, ADDRESS_LEN) {
        return Err(ApiError::InvalidAddress);
    }
    Address::from_str(raw).map_err(|_| ApiError::InvalidAddress)
}

/// Parse a transaction hash.
pub fn parse_tx_hash(raw: &str) -> Result<TxHash, ApiError> {
    if !has_hex_shape(raw, TX_HASH_LEN) {
        return Err(ApiError::InvalidTxHash);
    }
    TxHash::from_str(raw).map_err(|_| ApiError::InvalidTxHash)
}

/// `0x` prefix, exact length, hex digits only. Mixed case is accepted.
fn has_hex_shape(raw: &str, len: usize) -> bool {
    raw.len() == len
        && raw.starts_with("0x")
        && raw[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VITALIK: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
    const TX: &str = "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

    #[test]
    fn test_valid_address() {
        let addr = parse_address(VITALIK).unwrap();
        assert_eq!(addr.to_string().to_lowercase(), VITALIK.to_lowercase());
        assert!(parse_address(&VITALIK.to_lowercase()).is_ok());
    }

    #[test]
    fn test_malformed_addresses() {
        let bad = [
            "",
            "0x",
            "d8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "0Xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA9604",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA960455",
            "0xg8dA6BF26964aF9D7eEd9e03E53415D37aA96045",
            "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA9604 ",
        ];
        for raw in bad {
            assert!(
                matches!(parse_address(raw), Err(ApiError::InvalidAddress)),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_valid_tx_hash() {
        let hash = parse_tx_hash(TX).unwrap();
        assert_eq!(hash.to_string(), TX);
    }

    #[test]
    fn test_malformed_tx_hashes() {
        assert!(matches!(parse_tx_hash(VITALIK), Err(ApiError::InvalidTxHash)));
        assert!(matches!(parse_tx_hash(&TX[2..]), Err(ApiError::InvalidTxHash)));
        assert!(matches!(parse_tx_hash(&TX.replace('5', "z")), Err(ApiError::InvalidTxHash)));
        // Multi-byte characters must not panic on slicing.
        let wide = format!("0x{}", "é".repeat(32));
        assert!(matches!(parse_tx_hash(&wide), Err(ApiError::InvalidTxHash)));
    }
}

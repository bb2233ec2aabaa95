//! Amount parsing and unit scaling.

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;

use crate::etherscan::UpstreamError;

/// Parse a decimal integer string (account module amounts).
pub fn parse_decimal(raw: &str) -> Result<U256, UpstreamError> {
    U256::from_str_radix(raw, 10)
        .map_err(|_| UpstreamError::Malformed(format!("'{}' is not a decimal amount", raw)))
}

/// Parse a `0x`-prefixed quantity (JSON-RPC amounts). `0x` alone is zero.
pub fn parse_quantity(raw: &str) -> Result<U256, UpstreamError> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| UpstreamError::Malformed(format!("'{}' is not a hex quantity", raw)))?;
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|_| UpstreamError::Malformed(format!("'{}' is not a hex quantity", raw)))
}

/// Parse a `0x` quantity that must fit in 64 bits (gas, block numbers).
pub fn parse_quantity_u64(raw: &str) -> Result<u64, UpstreamError> {
    let value = parse_quantity(raw)?;
    u64::try_from(value)
        .map_err(|_| UpstreamError::Malformed(format!("'{}' does not fit in 64 bits", raw)))
}

/// Scale an integer amount down by `decimals` into a float.
pub fn scale(amount: U256, decimals: u8) -> f64 {
    format_units(amount, decimals)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0").unwrap(), U256::ZERO);
        assert_eq!(
            parse_decimal("1000000000000000000").unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert!(parse_decimal("0x10").is_err());
        assert!(parse_decimal("").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), U256::ZERO);
        assert_eq!(parse_quantity("0x").unwrap(), U256::ZERO);
        assert_eq!(parse_quantity("0x5208").unwrap(), U256::from(21000u64));
        assert!(parse_quantity("5208").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[test]
    fn test_parse_quantity_u64_overflow() {
        assert_eq!(parse_quantity_u64("0xffffffffffffffff").unwrap(), u64::MAX);
        assert!(parse_quantity_u64("0x10000000000000000").is_err());
    }

    #[test]
    fn test_scale() {
        let one_eth = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(scale(one_eth, 18), 1.0);
        assert_eq!(scale(U256::from(1_500_000u64), 6), 1.5);
        assert_eq!(scale(U256::from(20_000_000_000u64), 9), 20.0);
        assert_eq!(scale(U256::ZERO, 18), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456789, 6), 1.234568);
        assert_eq!(round_to(0.0000004, 6), 0.0);
    }
}

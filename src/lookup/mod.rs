//! Wallet and transaction lookups built on the Etherscan client.
//!
//! # Data Flow
//! ```text
//! path parameter
//!     → validate.rs (0x prefix, length, hex) ── reject → 400, no upstream call
//!     → wallet.rs / transaction.rs (one or more upstream calls)
//!     → units.rs (wei / hex quantity decoding for summaries)
//! ```

pub mod transaction;
pub mod units;
pub mod validate;
pub mod wallet;

pub use transaction::TransactionDetails;
pub use validate::{parse_address, parse_tx_hash};
pub use wallet::{TxSummary, WalletSummary};

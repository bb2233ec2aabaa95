//! Etherscan upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Handler (validated Address / TxHash)
//!     → client.rs (build query, attach chainid + apikey)
//!     → pacer.rs (wait for an outbound slot)
//!     → HTTP GET with timeout
//!     → types.rs (classify envelope: ok / rejected / malformed)
//! ```
//!
//! # Security Constraints
//! - API key ONLY from configuration or environment
//! - Never log the API key or the full upstream URL
//! - Every call has a timeout

pub mod client;
pub mod pacer;
pub mod types;

pub use client::EtherscanClient;
pub use types::{UpstreamError, UpstreamResult};

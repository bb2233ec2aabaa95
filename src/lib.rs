//! Ethereum Explorer Proxy Library
//!
//! Relays wallet and transaction lookups from a static frontend to the
//! Etherscan v2 API, holding the API key server-side and applying CORS and
//! per-client rate limits at the edge.

pub mod config;
pub mod etherscan;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod observability;
pub mod security;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

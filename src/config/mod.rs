//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → ProxyConfig::apply_env_overrides (ETHERSCAN_APIKEY, PORT)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{
    CorsConfig, FrontendConfig, ListenerConfig, ObservabilityConfig, ProxyConfig,
    RateLimitConfig, TimeoutConfig, TokenConfig, UpstreamConfig,
};
pub use validation::{validate_config, ValidationError};

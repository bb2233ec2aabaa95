//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → cors.rs (answer preflight, restrict origins)
//!     → rate_limit.rs (per-client fixed window, /api routes only)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Preflight requests never count against the rate limit
//! - Rejections use the same JSON error envelope as handlers

pub mod cors;
pub mod rate_limit;

pub use cors::cors_layer;
pub use rate_limit::{rate_limit_middleware, RateLimiterState};

//! Cross-origin policy for the frontend.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::CorsConfig;

/// Build the CORS layer from configuration.
///
/// Only `GET` lookups (plus preflight) are allowed. Origins that fail to
/// parse are skipped; validation reports them before startup.
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.allows_any() {
        tracing::warn!("CORS allows any origin; set cors.allowed_origins for production");
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o.trim_end_matches('/')).ok())
        .collect();

    tracing::info!(origins = ?config.allowed_origins, "CORS restricted to configured origins");
    layer.allow_origin(AllowOrigin::list(origins))
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (CORS, request ID, tracing, timeout, rate limit)
//! - Serve the static frontend when configured
//! - Run until the shutdown signal fires

use axum::{
    body::Body,
    error_handling::HandleErrorLayer,
    handler::HandlerWithoutStateExt,
    http::Request,
    middleware,
    routing::get,
    BoxError, Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::{timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::etherscan::{EtherscanClient, UpstreamResult};
use crate::http::handlers;
use crate::http::request::{request_id, RequestIdGenerator, X_REQUEST_ID};
use crate::security::{cors_layer, rate_limit, rate_limit_middleware, RateLimiterState};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub etherscan: EtherscanClient,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

/// HTTP server for the explorer proxy.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> UpstreamResult<Self> {
        let etherscan = EtherscanClient::new(&config.upstream)?;
        let rate_limiter = config
            .rate_limit
            .enabled
            .then(|| Arc::new(RateLimiterState::new(&config.rate_limit)));

        let state = AppState {
            config: Arc::new(config),
            etherscan,
            rate_limiter,
        };

        let router = Self::build_router(&state);
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: &AppState) -> Router {
        let config = &state.config;
        let request_secs = config.timeouts.request_secs;

        let mut api: Router<AppState> = Router::new()
            .route("/api/wallet/{address}", get(handlers::wallet))
            .route("/api/wallet/{address}/summary", get(handlers::wallet_summary))
            .route("/api/transaction/{tx_hash}", get(handlers::transaction))
            .route(
                "/api/transaction/{tx_hash}/details",
                get(handlers::transaction_details),
            );
        if let Some(limiter) = &state.rate_limiter {
            api = api.route_layer(middleware::from_fn_with_state(
                limiter.clone(),
                rate_limit_middleware,
            ));
        }

        let mut app: Router<AppState> = Router::new()
            .route("/health", get(handlers::health))
            .merge(api);

        app = match config.frontend.static_dir.as_deref() {
            Some(dir) => {
                if !Path::new(dir).is_dir() {
                    tracing::warn!(static_dir = %dir, "Static directory does not exist");
                }
                app.fallback_service(
                    ServeDir::new(dir).not_found_service(handlers::not_found.into_service()),
                )
            }
            None => app
                .route("/", get(handlers::health))
                .fallback(handlers::not_found),
        };

        app.with_state(state.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(move |err: BoxError| async move {
                        handlers::middleware_error(err, request_secs)
                    }))
                    .layer(TimeoutLayer::new(Duration::from_secs(request_secs))),
            )
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %request_id(req),
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, RequestIdGenerator))
            .layer(cors_layer(&config.cors))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            rate_limit = self.state.rate_limiter.is_some(),
            static_dir = ?self.state.config.frontend.static_dir,
            "HTTP server starting"
        );

        if let Some(limiter) = &self.state.rate_limiter {
            tokio::spawn(rate_limit::run_pruner(limiter.clone(), shutdown.resubscribe()));
        }

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.state.config
    }

    /// The router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler on every path
//! - Wire up middleware (request ID, tracing, request timeout)
//! - Own the injected cache store and the origin client
//! - Serve until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, routing::any, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::{build_store, CacheStore, FlightGroup};
use crate::config::ProxyConfig;
use crate::http::handler::proxy_handler;
use crate::http::origin::OriginClient;
use crate::http::request::{UuidRequestId, X_REQUEST_ID};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<dyn CacheStore>,
    pub origin: Arc<OriginClient>,
    /// Present only when single-flight is enabled.
    pub flights: Option<Arc<FlightGroup>>,
}

impl AppState {
    pub fn new(config: &ProxyConfig, cache: Arc<dyn CacheStore>) -> Result<Self, reqwest::Error> {
        let flights = config
            .cache
            .single_flight
            .then(|| Arc::new(FlightGroup::new()));

        Ok(Self {
            cache,
            origin: Arc::new(OriginClient::new(config)?),
            flights,
        })
    }
}

/// HTTP server for the caching proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    cache: Arc<dyn CacheStore>,
}

impl HttpServer {
    /// Create a new HTTP server with the store selected in `config`.
    pub fn new(config: ProxyConfig) -> Result<Self, reqwest::Error> {
        let cache = build_store(config.cache.store);
        Self::with_store(config, cache)
    }

    /// Create a new HTTP server around an existing cache store.
    pub fn with_store(
        config: ProxyConfig,
        cache: Arc<dyn CacheStore>,
    ) -> Result<Self, reqwest::Error> {
        let state = AppState::new(&config, cache.clone())?;
        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            cache,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` resolves. In-flight requests drain before this returns.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.origin.url,
            store = ?self.config.cache.store,
            single_flight = self.config.cache.single_flight,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!(cached_entries = self.cache.len(), "HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router, for driving requests in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The cache store this server reads and fills.
    pub fn cache(&self) -> Arc<dyn CacheStore> {
        self.cache.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tower_http::trace::TraceLayer;
use tracker_core::DefaultCarrierRegistry;
use tracker_graphql::{GatewayState, Lifecycle, graphql_router};

use crate::{config::AppConfig, handlers, middleware as app_middleware};

pub struct TrackerServer {
    addr: SocketAddr,
    app: Router,
}

/// Creates the gateway lifecycle described by the configuration.
///
/// Nothing is initialized until the first `ensure_ready()`.
pub fn build_lifecycle(cfg: &AppConfig) -> Lifecycle {
    let mut registry = DefaultCarrierRegistry::new();
    if let Some(ref fixtures) = cfg.registry.fixtures {
        registry = registry.with_fixtures(fixtures.clone());
    }
    Lifecycle::new(Arc::new(registry), cfg.graphql.to_schema_builder_config())
}

pub fn build_app(cfg: &AppConfig, lifecycle: Arc<Lifecycle>) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    let gateway_state = GatewayState::new(Arc::clone(&lifecycle), cfg.auth.api_key.as_str());

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        .with_state(lifecycle)
        // GraphQL endpoint (API key protected)
        .merge(graphql_router(gateway_state))
        // Middleware stack (order: request id -> trace -> body limit)
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record(
                            "http.status_code",
                            tracing::field::display(res.status().as_u16()),
                        );
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    lifecycle: Option<Arc<Lifecycle>>,
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            lifecycle: None,
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    /// Uses an existing lifecycle, e.g. one that is already ready.
    pub fn with_lifecycle(mut self, lifecycle: Arc<Lifecycle>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    pub fn build(self) -> TrackerServer {
        let lifecycle = self
            .lifecycle
            .unwrap_or_else(|| Arc::new(build_lifecycle(&self.config)));
        let app = build_app(&self.config, lifecycle);

        TrackerServer {
            addr: self.addr,
            app,
        }
    }
}

impl TrackerServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

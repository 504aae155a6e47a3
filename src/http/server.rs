//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router: status route plus mount catch-all
//! - Wire up middleware (tracing, request ID, rate limiting)
//! - Dispatch matched requests through the forwarder
//! - Record request metrics
//!
//! # Design Decisions
//! - One catch-all route; mount lookup happens in our table, not Axum's
//! - The status route reports the rate-limit flag but never blocks
//! - No mount match falls through to a plain 404
//! - A dropped client connection drops the handler future, cancelling the
//!   in-flight upstream call with it

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Json, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::RouterConfig;
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::observability::metrics;
use crate::routing::MountTable;
use crate::security::rate_limit::{self, RateLimitDecision, RateLimiterState};
use crate::upstream::{CredentialStore, Forwarder};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub mounts: Arc<MountTable>,
    pub credentials: Arc<CredentialStore>,
    pub forwarder: Arc<Forwarder>,
    pub rate_limiter: Arc<RateLimiterState>,
}

/// HTTP server for the edge router.
pub struct HttpServer {
    router: Router,
    rate_limiter: Arc<RateLimiterState>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RouterConfig) -> Self {
        let rate_limiter = Arc::new(RateLimiterState::new(config.rate_limit));
        let state = AppState {
            mounts: Arc::new(MountTable::from_config(config.mounts)),
            credentials: Arc::new(CredentialStore::from_config(config.credentials)),
            forwarder: Arc::new(Forwarder::new()),
            rate_limiter: rate_limiter.clone(),
        };

        let router = Self::build_router(state);
        Self { router, rate_limiter }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let rate_limiter = state.rate_limiter.clone();
        Router::new()
            .route(
                "/",
                get(status_handler).layer(middleware::from_fn_with_state(
                    rate_limiter.clone(),
                    rate_limit::observe_rate_limit,
                )),
            )
            .route(
                "/{*path}",
                any(proxy_handler).layer(middleware::from_fn_with_state(
                    rate_limiter,
                    rate_limit::enforce_rate_limit,
                )),
            )
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        // Periodically drop stale rate-limit windows.
        let sweeper = self.rate_limiter.clone();
        let mut sweep_shutdown = shutdown.resubscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(60));
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let swept = sweeper.sweep();
                        if swept > 0 {
                            tracing::debug!(swept, "Swept expired rate-limit windows");
                        }
                    }
                    _ = sweep_shutdown.recv() => break,
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Status route: reports the rate-limit decision without acting on it.
async fn status_handler(request: Request) -> Response {
    let limited = request
        .extensions()
        .get::<RateLimitDecision>()
        .map(|decision| decision.limited)
        .unwrap_or(false);

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .map(|host| host.split(':').next().unwrap_or(host))
        .unwrap_or("");

    Json(serde_json::json!({
        "message": format!("router.{} rateLimit: {}", host, limited),
    }))
    .into_response()
}

/// Main proxy handler.
/// Looks up the mount, resolves the credential, and forwards the request.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let path = request.uri().path().to_string();
    let method = request.method().to_string();

    let mount = match state.mounts.match_path(&path) {
        Some(mount) => mount,
        None => {
            tracing::warn!(request_id = %request_id, path = %path, "No mount matched");
            metrics::record_request(&method, StatusCode::NOT_FOUND.as_u16(), "none", start_time);
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let upstream_path = mount.upstream_path(&path);
    let credential = state.credentials.resolve(&mount.upstream_base);

    tracing::debug!(
        request_id = %request_id,
        mount = %mount.name,
        method = %method,
        upstream_path = %upstream_path,
        "Proxying request"
    );

    match state
        .forwarder
        .forward(
            request,
            &mount.upstream_base,
            &upstream_path,
            credential,
            &mount.header_overrides,
        )
        .await
    {
        Ok(response) => {
            metrics::record_request(&method, response.status().as_u16(), &mount.name, start_time);
            response
        }
        Err(error) => {
            tracing::error!(
                request_id = %request_id,
                mount = %mount.name,
                error = %error,
                "Upstream error"
            );
            metrics::record_request(
                &method,
                StatusCode::BAD_GATEWAY.as_u16(),
                &mount.name,
                start_time,
            );
            error.into_response()
        }
    }
}

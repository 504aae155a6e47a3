//! Edge reverse-proxy router.
//!
//! A small rate-limited request router built with Tokio and Axum. Incoming
//! requests are matched against configured mount prefixes, rewritten, and
//! forwarded to third-party upstream APIs with the right credential header
//! attached; responses stream back verbatim.
//!
//! ```text
//! Client ──▶ http/server ──▶ routing (mount table + rewrite)
//!                               │
//!                               ▼
//!                       upstream (credentials + forwarder) ──▶ Upstream API
//!
//! Cross-cutting: config, security/rate_limit, observability, lifecycle
//! ```

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edge_router::config::loader::load_config;
use edge_router::http::HttpServer;
use edge_router::lifecycle::Shutdown;
use edge_router::observability::metrics;
use edge_router::RouterConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edge_router=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("edge-router v0.1.0 starting");

    // Load configuration; missing config means built-in defaults.
    let config = match std::env::var("ROUTER_CONFIG") {
        Ok(path) => load_config(std::path::Path::new(&path))?,
        Err(_) => {
            tracing::warn!("ROUTER_CONFIG not set; using built-in defaults");
            RouterConfig::default()
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        mounts = config.mounts.len(),
        rate_limit_enabled = config.rate_limit.enabled,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_ctrl_c());

    let server = HttpServer::new(config);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

//! edge-gateway - HTTP forwarding gateway for the dashboard backend
//!
//! This is the composition root that wires together all the components.

use edge_gateway::{load_config, BackendOrigin, ForwardService, HttpServer, ReqwestUpstream};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    tracing::info!(
        "starting edge-gateway listen={} backend={}",
        cfg.listen_addr,
        cfg.backend_origin
    );

    // Outbound adapter: HTTP client with auto-redirects disabled
    let upstream = Arc::new(ReqwestUpstream::new(
        cfg.upstream_timeout_secs.map(Duration::from_secs),
    )?);

    // Application service
    let forwarder = Arc::new(ForwardService::new(
        upstream,
        BackendOrigin::new(cfg.backend_origin),
    ));

    // Inbound adapter
    let server = HttpServer::new(cfg.listen_addr, forwarder);
    server.run().await
}

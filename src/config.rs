//! Gateway configuration, resolved once from the environment at startup.

/// Immutable process-wide configuration.
///
/// Injected into the components that need it; never a mutable global.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the gateway binds to.
    pub listen_addr: String,
    /// Backend origin every reserved-prefix request is forwarded to.
    pub backend_origin: String,
    /// Optional outbound request timeout. Unset means the request blocks
    /// for as long as the backend does.
    pub upstream_timeout_secs: Option<u64>,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:3000".to_string(),
            backend_origin: "http://backend:8000".to_string(),
            upstream_timeout_secs: None,
            debug: false,
        }
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let listen_addr = std::env::var("EDGE_GATEWAY_LISTEN_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let backend_origin =
        std::env::var("API_URL").unwrap_or_else(|_| "http://backend:8000".to_string());

    let upstream_timeout_secs = std::env::var("EDGE_GATEWAY_UPSTREAM_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok());

    let debug = std::env::var("DEBUG").is_ok();

    Ok(Config {
        listen_addr,
        backend_origin,
        upstream_timeout_secs,
        debug,
    })
}

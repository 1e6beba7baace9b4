//! edge-gateway Library
//!
//! Exposes the gateway components for use in integration tests and as a
//! library.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types
pub use adapters::inbound::{AppState, HttpServer};
pub use adapters::outbound::ReqwestUpstream;
pub use application::ForwardService;
pub use config::{load_config, Config};
pub use domain::entities::{OutboundRequest, ProxyBody, UpstreamResponse};
pub use domain::ports::{Upstream, UpstreamError};
pub use domain::value_objects::BackendOrigin;

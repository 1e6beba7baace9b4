//! Upstream Port
//!
//! Defines the interface for sending a constructed request to the backend.
//! The production implementation is an HTTP client with auto-redirects
//! disabled; tests substitute a scripted fake.

use crate::domain::entities::{OutboundRequest, UpstreamResponse};
use async_trait::async_trait;

/// Failure while building or sending an upstream request.
///
/// Callers collapse every variant into the same opaque gateway error, so
/// the distinction exists only for logging.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream request: {0}")]
    InvalidRequest(String),
    #[error("upstream transport failed: {0}")]
    Transport(String),
}

/// Outbound port for the single backend every request is forwarded to.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Send one request and return the raw response.
    ///
    /// Implementations must NOT follow redirects: redirect resolution is a
    /// gateway-level decision based on where the `Location` points.
    async fn send(&self, request: &OutboundRequest) -> Result<UpstreamResponse, UpstreamError>;
}

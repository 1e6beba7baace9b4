//! Forward Service - Main application use case
//!
//! Orchestrates the proxy logic: building the target URL against the
//! configured backend origin, sanitizing headers, forwarding the body per
//! its representation, and resolving internal redirects before the
//! response reaches the caller.

use crate::domain::entities::{HeaderPair, OutboundRequest, ProxyBody, UpstreamResponse};
use crate::domain::ports::{Upstream, UpstreamError};
use crate::domain::value_objects::BackendOrigin;
use std::sync::Arc;

/// Forwarding service for the reserved path namespace.
///
/// Stateless across requests: the only long-lived members are the backend
/// origin (read-only configuration) and the upstream port.
pub struct ForwardService {
    upstream: Arc<dyn Upstream>,
    origin: BackendOrigin,
}

impl ForwardService {
    pub fn new(upstream: Arc<dyn Upstream>, origin: BackendOrigin) -> Self {
        Self { upstream, origin }
    }

    pub fn origin(&self) -> &BackendOrigin {
        &self.origin
    }

    /// Forward one inbound request to the backend and return the response
    /// that should reach the original caller.
    ///
    /// A 3xx whose `Location` is under the backend origin is re-issued here
    /// (same method, headers, body) and the second response is returned;
    /// the intermediate redirect never reaches the caller. External
    /// redirects pass through untouched.
    pub async fn forward(
        &self,
        method: &str,
        path: &str,
        raw_query: Option<&str>,
        headers: Vec<HeaderPair>,
        body: ProxyBody,
    ) -> Result<UpstreamResponse, UpstreamError> {
        let target = self.origin.url_for(path, raw_query);
        tracing::info!("proxying {} {}", method, target);
        if let ProxyBody::Text(text) = &body {
            if is_json(&headers) {
                tracing::debug!("request body: {}", text);
            }
        }

        let request = OutboundRequest {
            method: method.to_string(),
            target,
            headers: sanitize_headers(headers),
            body,
        };

        let response = self.upstream.send(&request).await?;

        if response.is_redirect() {
            if let Some(location) = response
                .header("location")
                .and_then(|v| std::str::from_utf8(v).ok())
            {
                if self.origin.contains(location) {
                    tracing::info!("following internal redirect to {}", location);
                    let redirected = OutboundRequest {
                        target: location.to_string(),
                        ..request
                    };
                    return self.upstream.send(&redirected).await;
                }
            }
        }

        Ok(response)
    }
}

/// Strip headers the outbound transport must own.
///
/// `host` always goes: the target origin differs from the inbound host and
/// the client sets it from the target URL. Body-framing headers
/// (`content-length`, `transfer-encoding`) always go: the transport frames
/// the body it is actually given, so a stale inbound length can never
/// disagree with the forwarded payload. `content-type` goes for multipart
/// requests so the boundary stays consistent with the forwarded blob.
fn sanitize_headers(headers: Vec<HeaderPair>) -> Vec<HeaderPair> {
    let multipart = is_multipart(&headers);
    headers
        .into_iter()
        .filter(|(name, _)| {
            if name.eq_ignore_ascii_case("host")
                || name.eq_ignore_ascii_case("content-length")
                || name.eq_ignore_ascii_case("transfer-encoding")
            {
                return false;
            }
            if multipart && name.eq_ignore_ascii_case("content-type") {
                return false;
            }
            true
        })
        .collect()
}

fn is_multipart(headers: &[HeaderPair]) -> bool {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-type"))
        .and_then(|(_, v)| std::str::from_utf8(v).ok())
        .map(|ct| ct.to_ascii_lowercase().contains("multipart/form-data"))
        .unwrap_or(false)
}

fn is_json(headers: &[HeaderPair]) -> bool {
    headers
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case("content-type"))
        .and_then(|(_, v)| std::str::from_utf8(v).ok())
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false)
}

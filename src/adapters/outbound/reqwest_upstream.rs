//! Reqwest Upstream Adapter
//!
//! Sends constructed requests to the backend over HTTP. Auto-redirects are
//! disabled so the forwarding service can decide per `Location` whether a
//! redirect is resolved internally or handed back to the caller.

use crate::domain::entities::{OutboundRequest, ProxyBody, UpstreamResponse};
use crate::domain::ports::{Upstream, UpstreamError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect;
use std::time::Duration;

pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    /// Build the client. Without a configured timeout the request blocks
    /// for as long as the backend does.
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Upstream for ReqwestUpstream {
    async fn send(&self, request: &OutboundRequest) -> Result<UpstreamResponse, UpstreamError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;
            let value = HeaderValue::from_bytes(value)
                .map_err(|e| UpstreamError::InvalidRequest(e.to_string()))?;
            // append keeps repeated headers (e.g. cookies split across lines)
            headers.append(name, value);
        }

        let mut builder = self.client.request(method, &request.target).headers(headers);
        builder = match &request.body {
            ProxyBody::Empty => builder,
            ProxyBody::Text(text) => builder.body(text.clone()),
            ProxyBody::Binary(blob) => builder.body(blob.clone()),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(n, v)| (n.as_str().to_string(), v.as_bytes().to_vec()))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

//! Gateway HTTP Server
//!
//! Serves the reserved path namespace (`/api/*` and `/ws`) by forwarding to
//! the backend origin, plus the gateway's own routes (`/health`, the chat
//! endpoint). Everything else falls through to a plain 404 and never
//! touches the backend.

use crate::application::ForwardService;
use crate::domain::entities::{HeaderPair, ProxyBody, UpstreamResponse};
use crate::infrastructure::shutdown_signal;
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Chat request accepted from the dashboard UI.
#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

/// Health response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Shared server state: the forwarding service only.
#[derive(Clone)]
pub struct AppState {
    pub forwarder: Arc<ForwardService>,
}

/// Gateway HTTP server.
pub struct HttpServer {
    listen_addr: String,
    state: AppState,
}

impl HttpServer {
    pub fn new(listen_addr: String, forwarder: Arc<ForwardService>) -> Self {
        Self {
            listen_addr,
            state: AppState { forwarder },
        }
    }

    /// Build the router. Exposed so integration tests can serve it on an
    /// ephemeral port.
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/api/chat", get(chat_status_handler).post(chat_message_handler))
            .route("/api/*path", any(proxy_handler))
            .route("/ws", any(proxy_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(&self) -> anyhow::Result<()> {
        let app = Self::router(self.state.clone());
        let listener = TcpListener::bind(&self.listen_addr).await?;
        tracing::info!("edge gateway listening on {}", self.listen_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

// Handler functions

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Generic forwarder for the reserved namespace.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();

    let headers: Vec<HeaderPair> = parts
        .headers
        .iter()
        .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
        .collect();

    // GET/HEAD never read the inbound body, whatever it contains.
    let body = if parts.method == Method::GET || parts.method == Method::HEAD {
        ProxyBody::Empty
    } else {
        let content_type = parts
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.to_string());
        match axum::body::to_bytes(body, usize::MAX).await {
            Ok(raw) => ProxyBody::classify(content_type.as_deref(), raw),
            Err(e) => {
                tracing::error!("failed to read request body: {}", e);
                return proxy_error_response();
            }
        }
    };

    let result = state
        .forwarder
        .forward(
            parts.method.as_str(),
            parts.uri.path(),
            parts.uri.query(),
            headers,
            body,
        )
        .await;

    match result {
        Ok(response) => relay_response(response),
        Err(e) => {
            tracing::error!("proxy error: {}", e);
            proxy_error_response()
        }
    }
}

async fn chat_status_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Chat API is running. Use POST to send messages."
    }))
}

/// Chat endpoint: validates the message before forwarding to the backend.
async fn chat_message_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: ChatRequest = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("chat request was not valid JSON: {}", e);
            return chat_error_response();
        }
    };

    if payload.message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Message is required" })),
        )
            .into_response();
    }

    let chat_body = serde_json::json!({ "message": payload.message }).to_string();
    let headers = vec![("content-type".to_string(), b"application/json".to_vec())];

    match state
        .forwarder
        .forward("POST", "/api/chat", None, headers, ProxyBody::Text(chat_body))
        .await
    {
        Ok(response) if response.status < 400 => relay_response(response),
        Ok(response) => {
            tracing::error!("chat backend returned {}", response.status);
            chat_error_response()
        }
        Err(e) => {
            tracing::error!("chat proxy error: {}", e);
            chat_error_response()
        }
    }
}

/// Relay an upstream response to the original caller: status, headers and
/// full body copied through.
fn relay_response(upstream: UpstreamResponse) -> Response {
    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);

    if let Some(headers) = builder.headers_mut() {
        for (name, value) in &upstream.headers {
            // The body is fully buffered here, so hop-by-hop framing
            // headers from the upstream no longer apply.
            if name.eq_ignore_ascii_case("transfer-encoding")
                || name.eq_ignore_ascii_case("connection")
            {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_bytes(value),
            ) {
                headers.append(name, value);
            }
        }
    }

    builder
        .body(Body::from(upstream.body))
        .unwrap_or_else(|_| proxy_error_response())
}

fn proxy_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Proxy error" })),
    )
        .into_response()
}

fn chat_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": "Failed to process chat message" })),
    )
        .into_response()
}

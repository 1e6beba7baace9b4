//! Integration tests for the dedicated chat endpoint
//!
//! The chat route validates the message client-side of the backend and
//! forwards a clean JSON envelope, unlike the generic passthrough.

use edge_gateway::{AppState, BackendOrigin, ForwardService, HttpServer, ReqwestUpstream};
use std::sync::Arc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_gateway(origin: &str) -> String {
    let upstream = Arc::new(ReqwestUpstream::new(None).unwrap());
    let forwarder = Arc::new(ForwardService::new(upstream, BackendOrigin::new(origin)));
    let app = HttpServer::router(AppState { forwarder });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_chat_message_forwarded_to_backend() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(serde_json::json!({ "message": "hi" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "response": "hello there" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = spawn_gateway(&mock_server.uri()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/chat", gateway))
        .json(&serde_json::json!({ "message": "hi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["response"], "hello there");
}

#[tokio::test]
async fn test_chat_missing_message_rejected_before_backend() {
    let mock_server = MockServer::start().await;

    let gateway = spawn_gateway(&mock_server.uri()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/chat", gateway))
        .json(&serde_json::json!({ "note": "no message field" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "error": "Message is required" }));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_invalid_json_yields_chat_error() {
    let mock_server = MockServer::start().await;

    let gateway = spawn_gateway(&mock_server.uri()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/chat", gateway))
        .header("content-type", "application/json")
        .body("not json at all")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "error": "Failed to process chat message" })
    );
}

#[tokio::test]
async fn test_chat_backend_failure_collapses_to_chat_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = spawn_gateway(&mock_server.uri()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/api/chat", gateway))
        .json(&serde_json::json!({ "message": "hi" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "error": "Failed to process chat message" })
    );
}

#[tokio::test]
async fn test_chat_status_endpoint() {
    let mock_server = MockServer::start().await;

    let gateway = spawn_gateway(&mock_server.uri()).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/api/chat", gateway))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["message"],
        "Chat API is running. Use POST to send messages."
    );
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

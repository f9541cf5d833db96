//! Integration tests: build the router against a mocked upstream and drive
//! `/api/chat` and `/api/health` through `oneshot`.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use chatrelay_api::{AppState, config::ApiConfig};
use chatrelay_core::gemini::GeminiConfig;
use chatrelay_core::models::gemini::GenerateContentResponse;
use futures_util::{StreamExt, stream};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";
const STREAM_PATH: &str = "/v1beta/models/test-model:streamGenerateContent";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn app_for(server: &MockServer) -> axum::Router {
    app_at(format!("{}/v1beta", server.uri()))
}

fn app_at(base_url: String) -> axum::Router {
    let state = AppState::new(ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        gemini: GeminiConfig {
            base_url,
            model: "test-model".into(),
            api_key: Some("test-key".into()),
        },
    });
    chatrelay_api::router(state)
}

fn chat_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("parse JSON")
}

fn sse_event(text: &str) -> String {
    let record = serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    });
    format!("data: {record}\r\n\r\n")
}

/// Upstream that sends one event, then breaks the connection mid-body.
async fn spawn_dropping_upstream() -> String {
    let app = axum::Router::new().fallback(|| async {
        let reads = stream::iter(vec![
            Ok(Bytes::from(sse_event("partial"))),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "upstream dropped",
            )),
        ])
        .then(|read| async move {
            if read.is_err() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            read
        });
        Response::builder()
            .header(header::CONTENT_TYPE, "text/event-stream")
            .body(Body::from_stream(reads))
            .unwrap()
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/v1beta")
}

#[tokio::test]
async fn buffered_chat_returns_first_candidate_text() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Hi there"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = app_for(&server)
        .oneshot(chat_request(
            serde_json::json!({"messages": "Hello", "stream": false}),
        ))
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        read_json(resp).await,
        serde_json::json!({"response": "Hi there"})
    );
}

#[tokio::test]
async fn buffered_chat_without_text_returns_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": [{}]})),
        )
        .mount(&server)
        .await;

    let resp = app_for(&server)
        .oneshot(chat_request(serde_json::json!({"messages": "Hello"})))
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(read_json(resp).await["response"], "No response received.");
}

#[tokio::test]
async fn upstream_failure_becomes_structured_500() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let resp = app_for(&server)
        .oneshot(chat_request(
            serde_json::json!({"messages": "Hello", "stream": false}),
        ))
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = read_json(resp).await;
    assert!(json["error"].as_str().expect("error string").contains("500"));
    assert_eq!(json["details"], "quota exceeded");
}

#[tokio::test]
async fn blank_prompt_is_rejected_without_upstream_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resp = app_for(&server)
        .oneshot(chat_request(serde_json::json!({"messages": "   ", "stream": true})))
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = read_json(resp).await;
    assert!(json["error"].is_string());
    assert!(json["details"].is_string());
}

#[tokio::test]
async fn malformed_body_gets_error_payload() {
    let server = MockServer::start().await;
    let resp = app_for(&server)
        .oneshot(chat_request(serde_json::json!({"messages": 42})))
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(resp).await["details"].is_string());
}

#[tokio::test]
async fn streaming_chat_relays_ndjson_frames() {
    init_tracing();
    let server = MockServer::start().await;
    let body = format!(
        "{}data: {{broken\r\n\r\n{}data: [DONE]\r\n\r\n",
        sse_event("Hel"),
        sse_event("lo")
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("alt", "sse"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let resp = app_for(&server)
        .oneshot(chat_request(
            serde_json::json!({"messages": "Hello", "stream": true}),
        ))
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/x-ndjson"
    );

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let text = std::str::from_utf8(&bytes).expect("utf-8 body");
    assert!(text.ends_with('\n'));
    assert!(!text.contains("[DONE]"));

    let fragments: Vec<String> = text
        .lines()
        .map(|line| {
            let record: GenerateContentResponse = serde_json::from_str(line).expect("frame");
            record.first_text().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(fragments, vec!["Hel", "lo"]);
}

#[tokio::test]
async fn streaming_upstream_rejection_returns_error_before_frames() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let resp = app_for(&server)
        .oneshot(chat_request(
            serde_json::json!({"messages": "Hello", "stream": true}),
        ))
        .await
        .expect("request");

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = read_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("403"));
    assert_eq!(json["details"], "API key not valid");
}

#[tokio::test]
async fn streaming_upstream_drop_aborts_body() {
    init_tracing();
    let upstream = spawn_dropping_upstream().await;

    let resp = app_at(upstream)
        .oneshot(chat_request(
            serde_json::json!({"messages": "Hello", "stream": true}),
        ))
        .await
        .expect("request");
    assert_eq!(resp.status(), StatusCode::OK);

    let reads: Vec<Result<Bytes, axum::Error>> =
        resp.into_body().into_data_stream().collect().await;
    assert!(
        matches!(reads.last(), Some(Err(_))),
        "body must not end cleanly"
    );

    let delivered: Vec<u8> = reads
        .iter()
        .filter_map(|read| read.as_ref().ok())
        .flat_map(|chunk| chunk.iter().copied())
        .collect();
    let text = std::str::from_utf8(&delivered).expect("utf-8 frames");
    let fragments: Vec<String> = text
        .lines()
        .map(|line| {
            let record: GenerateContentResponse = serde_json::from_str(line).expect("frame");
            record.first_text().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(fragments, vec!["partial"]);
}

#[tokio::test]
async fn health_reports_model_and_key_presence() {
    let server = MockServer::start().await;
    let req = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();

    let resp = app_for(&server).oneshot(req).await.expect("request");

    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model"], "test-model");
    assert_eq!(json["upstreamConfigured"], true);
    assert_eq!(json["version"], chatrelay_core::version());
}

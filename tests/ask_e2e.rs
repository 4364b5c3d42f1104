use async_trait::async_trait;
use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use gemini_wrapper_service::{
    bridge::{GeminiBridge, GenerationOptions, GenerativeModel, ModelError},
    build_app, AppState,
};
use http::{Method, Request};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

struct StubModel {
    reply: &'static str,
    calls: AtomicUsize,
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(&self, _prompt: &str, _options: &GenerationOptions) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.to_string())
    }
}

fn stub(reply: &'static str) -> Arc<StubModel> {
    Arc::new(StubModel {
        reply,
        calls: AtomicUsize::new(0),
    })
}

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash:generateContent";

fn check_call(uri: &Uri, headers: &HeaderMap) -> Option<Response> {
    if uri.path() != GENERATE_PATH {
        return Some(StatusCode::NOT_FOUND.into_response());
    }
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
        return Some(StatusCode::UNAUTHORIZED.into_response());
    }
    None
}

type Received = Arc<Mutex<Vec<Value>>>;

async fn mock_gemini_ok(
    State(received): State<Received>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(rejected) = check_call(&uri, &headers) {
        return rejected;
    }
    received.lock().unwrap().push(body);
    Json(json!({
        "candidates": [{
            "content": {
                "parts": [{ "text": "{\"category\":\"Grammar Correction\",\"answer\":\"Hello, world.\"}" }]
            }
        }]
    }))
    .into_response()
}

async fn mock_gemini_exhausted(uri: Uri, headers: HeaderMap) -> Response {
    if let Some(rejected) = check_call(&uri, &headers) {
        return rejected;
    }
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        })),
    )
        .into_response()
}

async fn spawn_mock_gemini_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}/v1beta", addr)
}

fn gemini_app(base_url: &str) -> Router {
    let bridge = GeminiBridge::new("test-key", base_url, "gemini-1.5-flash");
    build_app(AppState::new(Arc::new(bridge), "frontend"))
}

fn ask_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/ask")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn e2e_ask_returns_classified_answer() {
    let model = stub(r#"{"category":"Code Help","answer":"x"}"#);
    let app = build_app(AppState::new(model.clone(), "frontend"));

    let response = app.oneshot(ask_request(r#"{"message":"fix it"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "category": "Code Help", "answer": "x" }));
    assert_eq!(model.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn e2e_ask_empty_message_is_rejected_without_model_call() {
    let model = stub("unused");
    let app = build_app(AppState::new(model.clone(), "frontend"));

    let response = app.oneshot(ask_request(r#"{"message":"   "}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await, json!({ "error": "Message cannot be empty" }));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn e2e_ask_missing_field_is_rejected() {
    let model = stub("unused");
    let app = build_app(AppState::new(model.clone(), "frontend"));

    let response = app.oneshot(ask_request("{}")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn e2e_ask_non_json_model_output_is_500() {
    let app = build_app(AppState::new(stub("not json"), "frontend"));

    let response = app.oneshot(ask_request(r#"{"message":"hi"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse model response:"));
}

#[tokio::test]
async fn e2e_ask_through_gemini_bridge() {
    let received = Received::default();
    let mock = Router::new()
        .fallback(mock_gemini_ok)
        .with_state(received.clone());
    let base_url = spawn_mock_gemini_server(mock).await;

    let response = gemini_app(&base_url)
        .oneshot(ask_request(r#"{"message":"hello world"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "category": "Grammar Correction", "answer": "Hello, world." })
    );

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let sent = &received[0];
    let prompt = sent["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.ends_with("User Input: hello world"));
    let config = &sent["generationConfig"];
    assert_eq!(config["responseMimeType"], "application/json");
    assert_eq!(config["responseSchema"]["required"], json!(["category", "answer"]));
    assert_eq!(config["responseSchema"]["properties"]["category"]["type"], "STRING");
}

#[tokio::test]
async fn e2e_ask_quota_exhaustion_is_429() {
    let mock = Router::new().fallback(mock_gemini_exhausted);
    let base_url = spawn_mock_gemini_server(mock).await;

    let response = gemini_app(&base_url)
        .oneshot(ask_request(r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = json_body(response).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn e2e_unreachable_model_is_500() {
    let response = gemini_app("http://127.0.0.1:1/v1beta")
        .oneshot(ask_request(r#"{"message":"hello"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("An unexpected error occurred:"));
}

#[tokio::test]
async fn e2e_404_fallback_path_returns_not_found() {
    let app = build_app(AppState::new(stub("unused"), "frontend"));

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Not found" }));
}

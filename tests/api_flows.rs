use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use base64::Engine as _;
use sensecoach::country::Country;
use sensecoach::db::{Database, EventFilter};
use sensecoach::tests::util::init_test_db;
use sensecoach::{router, AiConfig, ApiConfig, ApiState};
use serde_json::{json, Value};
use teloxide::types::ChatId;
use tower::ServiceExt;
use wiremock::{
    matchers::{body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

const MODEL_REPLY: &str = "📌 **행사명**: 운동회
📅 **일시**: 2026-05-08 09:30
✅ **준비물**:
- 도시락
- 없음
🌐 **원문 번역**: 운동회가 열립니다.
---EVENT_SEPARATOR---
📌 **행사명**: Studiedag
📅 **일시**: 곧 안내 예정
🌐 **원문 번역**: 교사 연수일입니다.";

async fn gemini(reply_status: u16, body: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .respond_with(ResponseTemplate::new(reply_status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn ok_reply() -> Value {
    json!({ "candidates": [{ "content": { "parts": [{ "text": MODEL_REPLY }] } }] })
}

fn app(db: Database, server: &MockServer) -> Router {
    let ai = AiConfig {
        models: vec!["gemini-test".into()],
        gemini_url: Some(server.uri()),
        ..AiConfig::new("k")
    };
    router(
        ApiState {
            db,
            ai: Some(ai),
            default_country: Country::Netherlands,
        },
        ApiConfig {
            rate_limit_per_second: None,
        },
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn analyze_returns_raw_parsed_and_diagnostics() {
    let server = gemini(200, ok_reply()).await;
    let db = init_test_db().await;

    let response = app(db.clone(), &server)
        .oneshot(post_json(
            "/api/analyze",
            json!({ "chat_id": 1, "text": "Beste ouders, op 8 mei is de sportdag." }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let body = body_json(response).await;
    assert_eq!(body["raw_result"], MODEL_REPLY);
    assert_eq!(body["country"], "네덜란드");
    let events = body["parsed_events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["event_name"], "운동회");
    assert_eq!(events[0]["checklist_items"], json!(["도시락"]));
    assert_eq!(events[1]["event_date"], "");

    let diagnostics = body["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0]["rejected_items"], json!(["없음"]));
    assert_eq!(diagnostics[1]["unparsed_date"], "곧 안내 예정");

    // nothing is stored unless asked
    assert!(body["saved_event_ids"].as_array().unwrap().is_empty());
    assert!(db
        .list_events(ChatId(1), EventFilter::All)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn analyze_can_save_events() {
    let server = gemini(200, ok_reply()).await;
    let db = init_test_db().await;

    let response = app(db.clone(), &server)
        .oneshot(post_json(
            "/api/analyze",
            json!({ "chat_id": 2, "text": "notice", "save": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["saved_event_ids"].as_array().unwrap().len(), 2);

    let stored = db.list_events(ChatId(2), EventFilter::All).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].event.event_name, "운동회");
    assert_eq!(stored[0].checklist.len(), 1);
}

#[tokio::test]
async fn analyze_uses_chat_country_in_prompt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-test:generateContent"))
        .and(body_string_contains("Parent-Teacher Association"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_reply()))
        .expect(1)
        .mount(&server)
        .await;
    let db = init_test_db().await;
    db.set_country(ChatId(3), "미국").await.unwrap();

    let response = app(db, &server)
        .oneshot(post_json("/api/analyze", json!({ "chat_id": 3, "text": "PTA meeting" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["country"], "미국");
    server.verify().await;
}

#[tokio::test]
async fn analyze_accepts_image_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("inline_data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_reply()))
        .expect(1)
        .mount(&server)
        .await;
    let db = init_test_db().await;
    let image = base64::engine::general_purpose::STANDARD.encode(b"\xff\xd8\xff\xe0jpeg");

    let response = app(db, &server)
        .oneshot(post_json("/api/analyze", json!({ "image_base64": image })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    server.verify().await;
}

#[tokio::test]
async fn save_without_chat_is_rejected_before_model_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_reply()))
        .expect(0)
        .mount(&server)
        .await;
    let db = init_test_db().await;

    let response = app(db, &server)
        .oneshot(post_json("/api/analyze", json!({ "text": "notice", "save": true })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_request");
    server.verify().await;
}

#[tokio::test]
async fn analyze_model_failure_is_bad_gateway() {
    let server = gemini(403, json!({ "error": { "message": "API key not valid" } })).await;
    let db = init_test_db().await;

    let response = app(db, &server)
        .oneshot(post_json("/api/analyze", json!({ "text": "notice" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "model_error");
    assert!(body["detail"].as_str().unwrap().contains("API key not valid"));
}

#[tokio::test]
async fn children_rename_and_delete_over_http() {
    let server = MockServer::start().await;
    let db = init_test_db().await;
    let app = app(db.clone(), &server);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/chats/7/children")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["children"], json!(["첫째", "둘째"]));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/chats/7/children/%EC%B2%AB%EC%A7%B8")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "name": "민지" }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/chats/7/children/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(db.list_children(ChatId(7)).await.unwrap(), vec!["민지", "둘째"]);
}

#[tokio::test]
async fn reset_endpoint_clears_chat() {
    let server = MockServer::start().await;
    let db = init_test_db().await;
    db.save_event(ChatId(8), &Default::default()).await.unwrap();

    let response = app(db.clone(), &server)
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/api/chats/8/data")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["affected"], 1);
    assert!(db
        .list_events(ChatId(8), EventFilter::All)
        .await
        .unwrap()
        .is_empty());
}

use sensecoach::ai::{generate, AiConfig, GenerateError};
use wiremock::{
    matchers::{body_string_contains, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn config(server: &MockServer, models: &[&str]) -> AiConfig {
    AiConfig {
        models: models.iter().map(|m| m.to_string()).collect(),
        gemini_url: Some(server.uri()),
        ..AiConfig::new("test-key")
    }
}

fn reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": text }] } }]
    })
}

fn not_found(model: &str) -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(serde_json::json!({
        "error": { "code": 404, "message": format!("models/{model} is not found for API version v1beta") }
    }))
}

#[tokio::test]
async fn falls_back_past_missing_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/retired:generateContent"))
        .respond_with(not_found("retired"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/current:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("📌 행사명: 소풍")))
        .expect(1)
        .mount(&server)
        .await;

    let text = generate(&config(&server, &["retired", "current"]), "prompt", None)
        .await
        .unwrap();
    assert_eq!(text, "📌 행사명: 소풍");
    server.verify().await;
}

#[tokio::test]
async fn empty_reply_moves_to_next_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/quiet:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/chatty:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("결과")))
        .expect(1)
        .mount(&server)
        .await;

    let text = generate(&config(&server, &["quiet", "chatty"]), "prompt", None)
        .await
        .unwrap();
    assert_eq!(text, "결과");
}

#[tokio::test]
async fn auth_failure_stops_immediately() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/first:generateContent"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": { "code": 403, "message": "API key not valid" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/second:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let err = generate(&config(&server, &["first", "second"]), "prompt", None)
        .await
        .unwrap_err();
    match err {
        GenerateError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    server.verify().await;
}

#[tokio::test]
async fn exhausted_when_every_model_is_missing() {
    let server = MockServer::start().await;
    for model in ["a", "b"] {
        Mock::given(method("POST"))
            .and(path(format!("/v1beta/models/{model}:generateContent")))
            .respond_with(not_found(model))
            .expect(1)
            .mount(&server)
            .await;
    }

    let err = generate(&config(&server, &["a", "b"]), "prompt", None)
        .await
        .unwrap_err();
    match err {
        GenerateError::Exhausted { last_error } => {
            assert!(matches!(
                *last_error,
                GenerateError::ModelUnavailable { ref model, .. } if model == "b"
            ));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn image_requests_try_vision_model_with_inline_data() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/text-only:generateContent"))
        .respond_with(not_found("text-only"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro-vision:generateContent"))
        .and(body_string_contains("\"mime_type\":\"image/png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("사진 분석")))
        .expect(1)
        .mount(&server)
        .await;

    let png = b"\x89PNG\r\n\x1a\nrest-of-image";
    let text = generate(&config(&server, &["text-only"]), "prompt", Some(png))
        .await
        .unwrap();
    assert_eq!(text, "사진 분석");
    server.verify().await;
}

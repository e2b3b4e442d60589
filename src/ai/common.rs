use base64::Engine as _;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub fn generate_url(base: &str, model: &str) -> String {
    let model = model.trim_start_matches("models/");
    format!(
        "{}/v1beta/models/{model}:generateContent",
        base.trim_end_matches('/')
    )
}

/// Request body with the prompt and, when present, the inline image.
pub fn build_generate_body(prompt: &str, image: Option<&[u8]>) -> Value {
    let mut parts = vec![json!({ "text": prompt })];
    if let Some(bytes) = image {
        let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
        parts.push(json!({
            "inline_data": {
                "mime_type": image_mime_type(bytes),
                "data": encoded,
            }
        }));
    }
    json!({ "contents": [ { "parts": parts } ] })
}

/// Guesses the MIME type from magic bytes. Unknown data is sent as JPEG.
pub fn image_mime_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        "image/png"
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// Concatenated text of the first candidate. Empty when the model sent none.
pub fn parse_generated_text(raw: &str) -> serde_json::Result<String> {
    let response: GenerateResponse = serde_json::from_str(raw)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();
    Ok(text)
}

/// Message from a Gemini error body, or the raw body when it is not JSON.
pub fn error_message(raw: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(raw)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| raw.trim().to_string())
}

/// Whether a failure means this model id cannot serve the request.
pub fn is_model_unavailable(status: StatusCode, message: &str) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let lower = message.to_lowercase();
    lower.contains("not found") || lower.contains("not supported")
}

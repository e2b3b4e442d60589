//! Gemini `generateContent` client with ordered model fallback.

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, trace, warn};

use crate::ai::common::{
    build_generate_body, error_message, generate_url, is_model_unavailable, parse_generated_text,
    GEMINI_API_URL,
};
use crate::ai::config::AiConfig;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("model {model} is unavailable: {message}")]
    ModelUnavailable { model: String, message: String },
    #[error("model {model} returned an empty response")]
    EmptyResponse { model: String },
    #[error("Gemini API error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode Gemini response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no candidate model could serve the request: {last_error}")]
    Exhausted {
        #[source]
        last_error: Box<GenerateError>,
    },
    #[error("no candidate models configured")]
    NoCandidates,
}

impl GenerateError {
    /// Failures that move on to the next candidate model.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerateError::ModelUnavailable { .. } | GenerateError::EmptyResponse { .. }
        )
    }
}

/// Sends `prompt` (and `image`, if any) to each candidate model in turn and
/// returns the first non-empty reply.
///
/// Unknown or unsupported models and empty replies fall through to the next
/// candidate. Any other failure stops the loop immediately.
#[instrument(level = "trace", skip(config, prompt, image))]
pub async fn generate(
    config: &AiConfig,
    prompt: &str,
    image: Option<&[u8]>,
) -> Result<String, GenerateError> {
    let client = Client::builder().timeout(config.timeout()).build()?;
    let base = config.gemini_url.as_deref().unwrap_or(GEMINI_API_URL);
    let body = build_generate_body(prompt, image);

    let mut last_error = None;
    for model in config.candidate_models(image.is_some()) {
        match generate_with_model(&client, &config.api_key, base, model, &body).await {
            Ok(text) => {
                debug!(model, len = text.len(), "Gemini reply received");
                return Ok(text);
            }
            Err(err) if err.is_retryable() => {
                warn!(model, error = %err, "Trying next Gemini model");
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(match last_error {
        Some(err) => GenerateError::Exhausted {
            last_error: Box::new(err),
        },
        None => GenerateError::NoCandidates,
    })
}

#[instrument(level = "trace", skip(client, api_key, body))]
async fn generate_with_model(
    client: &Client,
    api_key: &str,
    base: &str,
    model: &str,
    body: &Value,
) -> Result<String, GenerateError> {
    let url = generate_url(base, model);
    debug!(url, "sending generateContent request");

    let resp = client
        .post(&url)
        .header("x-goog-api-key", api_key)
        .json(body)
        .send()
        .await?;

    let status = resp.status();
    let raw = resp.text().await?;
    if !status.is_success() {
        let message = error_message(&raw);
        if is_model_unavailable(status, &message) {
            return Err(GenerateError::ModelUnavailable {
                model: model.to_string(),
                message,
            });
        }
        warn!(%status, model, "Gemini API error");
        return Err(GenerateError::Api {
            status: status.as_u16(),
            message,
        });
    }

    trace!(raw = %raw, "generateContent response");
    let text = parse_generated_text(&raw)?;
    if text.trim().is_empty() {
        return Err(GenerateError::EmptyResponse {
            model: model.to_string(),
        });
    }
    Ok(text)
}

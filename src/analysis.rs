//! One-call notice analysis: prompt, model, parse.

use tracing::{debug, info, instrument};

use crate::ai::{build_prompt, generate, AiConfig, GenerateError};
use crate::country::Country;
use crate::parser::{parse_with_diagnostics, ParseOutcome};

/// A school notice as text, a photo, or both.
#[derive(Debug, Clone, Default)]
pub struct NoticeInput {
    pub text: Option<String>,
    pub image: Option<Vec<u8>>,
}

impl NoticeInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            image: None,
        }
    }

    pub fn image(bytes: Vec<u8>) -> Self {
        Self {
            text: None,
            image: Some(bytes),
        }
    }

    /// Text that is only whitespace counts as absent.
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, |t| t.trim().is_empty()) && self.image.is_none()
    }
}

/// Raw model reply alongside what the parser recovered from it.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub raw: String,
    pub outcome: ParseOutcome,
}

#[instrument(level = "trace", skip(config, input))]
pub async fn analyze_notice(
    config: &AiConfig,
    country: Country,
    input: NoticeInput,
) -> Result<Analysis, GenerateError> {
    let text = input.text.as_deref().filter(|t| !t.trim().is_empty());
    let prompt = build_prompt(country.key(), text, input.image.is_some());
    debug!(
        country = country.key(),
        has_text = text.is_some(),
        has_image = input.image.is_some(),
        "Analyzing notice"
    );

    let raw = generate(config, &prompt, input.image.as_deref()).await?;
    let outcome = parse_with_diagnostics(&raw, country.key());
    info!(
        events = outcome.events.len(),
        rejected_items = outcome.rejected_item_count(),
        "Notice analyzed"
    );
    Ok(Analysis { raw, outcome })
}

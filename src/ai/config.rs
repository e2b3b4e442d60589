use std::env;
use std::time::Duration;

/// Candidate models tried in order for every request.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-exp",
    "gemini-1.5-flash",
    "gemini-1.5-flash-8b",
    "gemini-1.5-pro",
    "gemini-pro",
];

pub const DEFAULT_VISION_MODEL: &str = "gemini-pro-vision";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: String,
    pub models: Vec<String>,
    pub vision_model: String,
    /// Base URL override, used by tests and proxies.
    pub gemini_url: Option<String>,
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Returns `None` when `GEMINI_API_KEY` is unset, which disables analysis.
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("GEMINI_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return None,
        };
        let models = env::var("GEMINI_MODELS")
            .ok()
            .map(|raw| parse_model_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect());
        Some(Self {
            api_key,
            models,
            vision_model: env::var("GEMINI_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            gemini_url: env::var("GEMINI_API_URL").ok(),
            timeout_secs: env::var("GEMINI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Config with the default model list, for callers that build it by hand.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            gemini_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Models to try, with the vision model appended for image requests.
    pub fn candidate_models(&self, has_image: bool) -> Vec<&str> {
        let mut models: Vec<&str> = self.models.iter().map(String::as_str).collect();
        if has_image && !models.contains(&self.vision_model.as_str()) {
            models.push(&self.vision_model);
        }
        models
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(|m| m.trim_start_matches("models/").to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_model_only_for_images() {
        let config = AiConfig::new("key");
        assert_eq!(config.candidate_models(false).len(), DEFAULT_MODELS.len());
        let with_image = config.candidate_models(true);
        assert_eq!(with_image.last(), Some(&DEFAULT_VISION_MODEL));
        assert_eq!(with_image[0], "gemini-2.0-flash");
    }

    #[test]
    fn vision_model_not_duplicated() {
        let mut config = AiConfig::new("key");
        config.models = vec!["gemini-pro-vision".into()];
        assert_eq!(config.candidate_models(true), vec!["gemini-pro-vision"]);
    }

    #[test]
    fn model_list_parsing() {
        assert_eq!(
            parse_model_list(" models/gemini-1.5-pro , ,gemini-pro"),
            vec!["gemini-1.5-pro", "gemini-pro"]
        );
        assert!(parse_model_list(" , ").is_empty());
    }
}

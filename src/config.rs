use std::env;

use crate::ai::config::AiConfig;
use crate::country::Country;
use crate::utils::DEFAULT_DELETE_AFTER_TIMEOUT;

/// Settings shared by the bot handlers.
#[derive(Clone, Debug)]
pub struct BotSettings {
    /// Country used for chats that never picked one.
    pub default_country: Country,
    /// Seconds before transient notices are removed.
    pub delete_after_timeout: u64,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            default_country: Country::default(),
            delete_after_timeout: DEFAULT_DELETE_AFTER_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub db_url: String,
    pub ai: Option<AiConfig>,
    pub bot: BotSettings,
    /// Address for the REST API. The API is off when unset.
    pub api_bind: Option<String>,
    pub api_rate_limit: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let db_url = env::var("DB_URL").unwrap_or_else(|_| "sqlite:sensecoach.db".to_string());
        let ai = AiConfig::from_env();
        let default_country = env::var("DEFAULT_COUNTRY")
            .ok()
            .and_then(|raw| match raw.parse::<Country>() {
                Ok(country) => Some(country),
                Err(err) => {
                    tracing::warn!(%err, "Ignoring DEFAULT_COUNTRY");
                    None
                }
            })
            .unwrap_or_default();
        let delete_after_timeout = env::var("DELETE_AFTER_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_DELETE_AFTER_TIMEOUT);
        let api_bind = env::var("API_BIND").ok().filter(|v| !v.trim().is_empty());
        let api_rate_limit = env::var("API_RATE_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|limit| *limit > 0);
        Self {
            db_url,
            ai,
            bot: BotSettings {
                default_country,
                delete_after_timeout,
            },
            api_bind,
            api_rate_limit,
        }
    }
}

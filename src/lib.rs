use anyhow::Result;
use dotenvy::dotenv;
use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

pub mod ai;
pub mod analysis;
pub mod api;
pub mod checklist;
pub mod commands;
pub mod config;
pub mod country;
pub mod db;
pub mod handlers;
pub mod messages;
pub mod parser;
pub mod system_info;
pub mod text_utils;
pub mod utils;

pub mod tests {
    pub mod util;
}

pub use ai::AiConfig;
pub use api::{router, ApiConfig, ApiState};
pub use commands::Command;
pub use config::{BotSettings, Config};
pub use handlers::{
    analyze_photo_notice, analyze_text_notice, callback_handler, format_event, format_event_list,
    help, show_system_info,
};
pub use parser::{parse_analysis_result, parse_with_diagnostics, ParsedEvent};

/// Update routing shared by the bot and the dispatcher tests.
///
/// Expects `Database`, `Option<AiConfig>` and `BotSettings` as dependencies.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .branch(Update::filter_callback_query().endpoint(callback_handler))
        .branch(
            Update::filter_message()
                .branch(
                    dptree::entry()
                        .filter(|msg: Message| msg.photo().is_some())
                        .endpoint(analyze_photo_notice),
                )
                .branch(dptree::entry().filter_command::<Command>().endpoint(
                    |bot: Bot,
                     msg: Message,
                     cmd: Command,
                     db: db::Database,
                     ai_config: Option<AiConfig>,
                     settings: BotSettings| async move {
                        cmd.dispatch(bot, msg, db, ai_config, settings).await
                    },
                ))
                .branch(dptree::endpoint(analyze_text_notice)),
        )
}

pub async fn run() -> Result<()> {
    // Load .env file if it exists (for local development)
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting SenseCoach bot...");

    let config = Config::from_env();
    if config.ai.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set, notice analysis is disabled");
    }

    let db = db::Database::open(&config.db_url, 5).await?;

    if let Some(bind) = config.api_bind.clone() {
        let state = ApiState {
            db: db.clone(),
            ai: config.ai.clone(),
            default_country: config.bot.default_country,
        };
        let app = router(
            state,
            ApiConfig {
                rate_limit_per_second: config.api_rate_limit,
            },
        );
        let listener = tokio::net::TcpListener::bind(&bind).await?;
        tracing::info!(%bind, "REST API listening");
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!(error = %err, "REST API stopped");
            }
        });
    }

    let bot = Bot::from_env();
    if let Err(err) = bot.set_my_commands(Command::bot_commands()).await {
        tracing::warn!(error = %err, "Failed to register bot commands");
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![db, config.ai, config.bot])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

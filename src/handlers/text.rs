use crate::db::Database;
use anyhow::Result;
use teloxide::prelude::*;

use crate::ai::AiConfig;
use crate::analysis::NoticeInput;
use crate::config::BotSettings;
use crate::messages::{ANALYSIS_DISABLED, HELP_TEXT};

use super::notice::process_notice;

pub async fn help(bot: Bot, msg: Message) -> Result<()> {
    bot.send_message(msg.chat.id, HELP_TEXT)
        .parse_mode(teloxide::types::ParseMode::Html)
        .await?;
    Ok(())
}

/// Treats any non-command text as a school notice.
pub async fn analyze_text_notice(
    bot: Bot,
    msg: Message,
    db: Database,
    ai_config: Option<AiConfig>,
    settings: BotSettings,
) -> Result<()> {
    let Some(text) = msg.text().filter(|t| !t.trim().is_empty()) else {
        return Ok(());
    };
    let Some(config) = ai_config else {
        bot.send_message(msg.chat.id, ANALYSIS_DISABLED).await?;
        return Ok(());
    };

    tracing::debug!(chat_id = msg.chat.id.0, len = text.len(), "Analyzing text notice");
    process_notice(
        &bot,
        msg.chat.id,
        &db,
        &config,
        &settings,
        NoticeInput::text(text),
    )
    .await
}

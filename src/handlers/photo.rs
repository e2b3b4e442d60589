use anyhow::Result;
use teloxide::prelude::*;

use crate::ai::AiConfig;
use crate::analysis::NoticeInput;
use crate::config::BotSettings;
use crate::db::Database;
use crate::messages::{ANALYSIS_DISABLED, PHOTO_DOWNLOAD_FAILED};
use crate::utils::download_telegram_file;

use super::notice::process_notice;

/// Analyzes the largest size of a photographed notice.
pub async fn analyze_photo_notice(
    bot: Bot,
    msg: Message,
    db: Database,
    ai_config: Option<AiConfig>,
    settings: BotSettings,
) -> Result<()> {
    let photo_sizes = match msg.photo() {
        Some(p) => p,
        None => return Ok(()),
    };
    let Some(file_id) = photo_sizes
        .iter()
        .max_by_key(|p| (p.width * p.height, p.file.size))
        .map(|p| &p.file.id)
    else {
        tracing::debug!("photo had no usable sizes");
        return Ok(());
    };
    let Some(config) = ai_config else {
        bot.send_message(msg.chat.id, ANALYSIS_DISABLED).await?;
        return Ok(());
    };

    let bytes = match download_telegram_file(&bot, file_id).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "photo download failed");
            bot.send_message(msg.chat.id, PHOTO_DOWNLOAD_FAILED).await?;
            return Ok(());
        }
    };

    tracing::debug!(chat_id = msg.chat.id.0, size = bytes.len(), "Analyzing photo notice");
    process_notice(
        &bot,
        msg.chat.id,
        &db,
        &config,
        &settings,
        NoticeInput::image(bytes),
    )
    .await
}

use anyhow::Result;
use teloxide::prelude::*;

use crate::ai::AiConfig;
use crate::system_info::get_system_info;

pub async fn show_system_info(bot: Bot, msg: Message, ai_config: Option<AiConfig>) -> Result<()> {
    tracing::debug!(chat_id = msg.chat.id.0, "Showing system info");
    bot.send_message(msg.chat.id, get_system_info(ai_config.as_ref()))
        .await?;
    Ok(())
}

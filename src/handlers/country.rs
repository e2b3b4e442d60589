use anyhow::Result;
use teloxide::{prelude::*, types::ChatId};

use crate::config::BotSettings;
use crate::country::Country;
use crate::db::Database;
use crate::messages::{country_updated_text, current_country_text, unknown_country_text};

/// Country stored for the chat, or the configured default.
pub async fn chat_country(db: &Database, chat_id: ChatId, settings: &BotSettings) -> Result<Country> {
    Ok(db
        .get_country(chat_id)
        .await?
        .map(|key| Country::from_key(&key))
        .unwrap_or(settings.default_country))
}

/// `/country` shows the current country, `/country <name>` changes it.
pub async fn show_or_set_country(
    bot: Bot,
    msg: Message,
    db: Database,
    settings: BotSettings,
    arg: String,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let arg = arg.trim();
    if arg.is_empty() {
        let current = chat_country(&db, chat_id, &settings).await?;
        bot.send_message(chat_id, current_country_text(current)).await?;
        return Ok(());
    }

    match arg.parse::<Country>() {
        Ok(country) => {
            db.set_country(chat_id, country.key()).await?;
            tracing::info!(chat_id = chat_id.0, country = country.key(), "Country changed");
            bot.send_message(chat_id, country_updated_text(country)).await?;
        }
        Err(err) => {
            tracing::debug!(chat_id = chat_id.0, %err, "Rejected country");
            bot.send_message(chat_id, unknown_country_text(arg)).await?;
        }
    }
    Ok(())
}

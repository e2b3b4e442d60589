use anyhow::Result;
use teloxide::{prelude::*, types::ChatId};

use super::country::chat_country;
use super::events::EventService;
use crate::ai::AiConfig;
use crate::analysis::{analyze_notice, NoticeInput};
use crate::config::BotSettings;
use crate::db::{Database, NewEvent};
use crate::messages::{rejected_items_text, ANALYSIS_FAILED, ANALYZING, NO_EVENTS_FOUND};
use crate::utils::{delete_after, try_delete_message};

/// Analyzes a notice, stores every event found and replies with one message
/// per event.
pub async fn process_notice(
    bot: &Bot,
    chat_id: ChatId,
    db: &Database,
    config: &AiConfig,
    settings: &BotSettings,
    input: NoticeInput,
) -> Result<()> {
    let country = chat_country(db, chat_id, settings).await?;
    let progress = bot.send_message(chat_id, ANALYZING).await?;
    let result = analyze_notice(config, country, input).await;
    try_delete_message(bot, chat_id, progress.id).await;

    let analysis = match result {
        Ok(analysis) => analysis,
        Err(err) => {
            tracing::warn!(chat_id = chat_id.0, error = %err, "Notice analysis failed");
            bot.send_message(chat_id, ANALYSIS_FAILED).await?;
            return Ok(());
        }
    };

    let outcome = analysis.outcome;
    if outcome.events.is_empty() {
        tracing::debug!(
            chat_id = chat_id.0,
            dropped = outcome.dropped_segments,
            "No events in model reply"
        );
        bot.send_message(chat_id, NO_EVENTS_FOUND).await?;
        return Ok(());
    }

    let rejected: Vec<String> = outcome
        .diagnostics
        .iter()
        .flat_map(|d| d.rejected_items.iter().cloned())
        .collect();

    let service = EventService::new(db);
    for event in outcome.events {
        let event_id = db.save_event(chat_id, &NewEvent::from(event)).await?;
        service.send_event(bot, chat_id, event_id).await?;
    }

    if !rejected.is_empty() {
        let sent = bot
            .send_message(chat_id, rejected_items_text(&rejected))
            .await?;
        drop(delete_after(
            bot.clone(),
            sent.chat.id,
            sent.id,
            settings.delete_after_timeout,
        ));
    }
    Ok(())
}

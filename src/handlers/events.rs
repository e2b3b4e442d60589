use anyhow::Result;
use teloxide::{
    prelude::*,
    types::{ChatId, MaybeInaccessibleMessage, Message, MessageId},
};

use super::format::{format_event, format_event_list};
use super::keyboard::{checklist_keyboard, parse_check_callback};
use crate::db::{Database, EventFilter};
use crate::messages::{
    CHAT_RESET, DELETE_USAGE, EVENT_DELETED, EVENT_NOT_FOUND, NO_EVENTS, NO_UPCOMING_EVENTS,
};
use crate::utils::{delete_after, try_delete_message, try_edit_message};

pub struct EventService<'a> {
    db: &'a Database,
}

impl<'a> EventService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Sends one event with its checklist keyboard.
    pub async fn send_event(&self, bot: &Bot, chat_id: ChatId, event_id: i64) -> Result<()> {
        let Some(event) = self.db.get_event(chat_id, event_id).await? else {
            tracing::warn!(chat_id = chat_id.0, event_id, "Event vanished before sending");
            return Ok(());
        };
        bot.send_message(chat_id, format_event(&event))
            .reply_markup(checklist_keyboard(&event))
            .await?;
        Ok(())
    }

    pub async fn send_events(&self, bot: Bot, chat_id: ChatId, filter: EventFilter) -> Result<()> {
        let events = self.db.list_events(chat_id, filter).await?;
        tracing::debug!(chat_id = chat_id.0, ?filter, count = events.len(), "Sending events");
        if events.is_empty() {
            let text = match filter {
                EventFilter::All => NO_EVENTS,
                EventFilter::Upcoming(_) => NO_UPCOMING_EVENTS,
            };
            bot.send_message(chat_id, text).await?;
            return Ok(());
        }
        bot.send_message(chat_id, format_event_list(&events)).await?;
        Ok(())
    }

    /// Re-renders an event message in place, e.g. after a checklist toggle.
    pub async fn update_message(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        message_id: MessageId,
        event_id: i64,
    ) -> Result<()> {
        let Some(event) = self.db.get_event(chat_id, event_id).await? else {
            return Ok(());
        };
        try_edit_message(
            bot,
            chat_id,
            message_id,
            format_event(&event),
            checklist_keyboard(&event),
        )
        .await;
        Ok(())
    }

    /// Handles `/delete <id>`.
    pub async fn delete(&self, bot: Bot, msg: Message, arg: &str, delete_after_timeout: u64) -> Result<()> {
        let chat_id = msg.chat.id;
        let reply = match arg.trim().trim_start_matches('#').parse::<i64>() {
            Ok(event_id) if self.db.delete_event(chat_id, event_id).await? => EVENT_DELETED,
            Ok(_) => EVENT_NOT_FOUND,
            Err(_) => {
                bot.send_message(chat_id, DELETE_USAGE).await?;
                return Ok(());
            }
        };
        let sent = bot.send_message(chat_id, reply).await?;
        drop(delete_after(bot.clone(), sent.chat.id, sent.id, delete_after_timeout));
        Ok(())
    }

    /// Handles `/reset`: removes everything stored for the chat.
    pub async fn reset(&self, bot: Bot, msg: Message, delete_after_timeout: u64) -> Result<()> {
        try_delete_message(&bot, msg.chat.id, msg.id).await;
        let removed = self.db.reset_chat(msg.chat.id).await?;
        tracing::info!(chat_id = msg.chat.id.0, removed, "Chat data reset");
        let confirmation = bot.send_message(msg.chat.id, CHAT_RESET).await?;
        drop(delete_after(
            bot.clone(),
            confirmation.chat.id,
            confirmation.id,
            delete_after_timeout,
        ));
        Ok(())
    }
}

async fn toggle_from_message(bot: &Bot, msg: &MaybeInaccessibleMessage, item_id: i64, db: &Database) -> Result<()> {
    let chat_id = msg.chat().id;
    match db.toggle_checklist_item(chat_id, item_id).await? {
        Some((event_id, checked)) => {
            tracing::debug!(chat_id = chat_id.0, item_id, checked, "Toggled checklist item");
            EventService::new(db)
                .update_message(bot, chat_id, msg.id(), event_id)
                .await
        }
        None => {
            tracing::debug!(chat_id = chat_id.0, item_id, "Checklist item not found");
            Ok(())
        }
    }
}

pub async fn callback_handler(bot: Bot, q: CallbackQuery, db: Database) -> Result<()> {
    if let (Some(data), Some(msg)) = (q.data.as_deref(), q.message.as_ref()) {
        if let Some(item_id) = parse_check_callback(data) {
            toggle_from_message(&bot, msg, item_id, &db).await?;
        }
    }

    bot.answer_callback_query(q.id).await?;
    Ok(())
}

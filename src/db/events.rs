use std::collections::HashMap;

use anyhow::Result;
use teloxide::types::ChatId;

use super::types::{ChecklistItem, EventFilter, EventRecord, EventUpdate, NewEvent, StoredEvent};
use super::{Database, NO_CHILD_TAG};
use crate::checklist::partition_checklist;

const EVENT_COLUMNS: &str = "id, chat_id, event_name, event_date, event_time, country, child_tag, \
     translation, cultural_context, tips, memo, created_at";

impl Database {
    /// Stores `event` and its valid checklist items. Returns the new event id.
    pub async fn save_event(&self, chat_id: ChatId, event: &NewEvent) -> Result<i64> {
        let created_at = chrono::Utc::now().timestamp();
        let child_tag = match event.child_tag.trim() {
            "" => NO_CHILD_TAG,
            tag => tag,
        };

        let mut tx = self.pool().begin().await?;
        let event_id = sqlx::query(
            "INSERT INTO events (chat_id, event_name, event_date, event_time, country, child_tag, \
             translation, cultural_context, tips, memo, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(chat_id.0)
        .bind(&event.event_name)
        .bind(&event.event_date)
        .bind(&event.event_time)
        .bind(&event.country)
        .bind(child_tag)
        .bind(&event.translation)
        .bind(&event.cultural_context)
        .bind(&event.tips)
        .bind(&event.memo)
        .bind(created_at)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        let (items, skipped) = partition_checklist(&event.checklist_items);
        for item in &items {
            sqlx::query("INSERT INTO checklist_items (event_id, item_name) VALUES (?, ?)")
                .bind(event_id)
                .bind(item)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        tracing::debug!(
            chat_id = chat_id.0,
            event_id,
            stored_items = items.len(),
            skipped_items = skipped.len(),
            "Saved event"
        );
        Ok(event_id)
    }

    pub async fn list_events(&self, chat_id: ChatId, filter: EventFilter) -> Result<Vec<StoredEvent>> {
        tracing::trace!(chat_id = chat_id.0, ?filter, "Listing events");
        let records: Vec<EventRecord> = match filter {
            EventFilter::All => {
                sqlx::query_as(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE chat_id = ? \
                     ORDER BY event_date = '', event_date, event_time, id"
                ))
                .bind(chat_id.0)
                .fetch_all(self.pool())
                .await?
            }
            EventFilter::Upcoming(today) => {
                sqlx::query_as(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events \
                     WHERE chat_id = ? AND event_date != '' AND event_date >= ? \
                     ORDER BY event_date, event_time, id"
                ))
                .bind(chat_id.0)
                .bind(today.format("%Y-%m-%d").to_string())
                .fetch_all(self.pool())
                .await?
            }
        };

        let items: Vec<ChecklistItem> = sqlx::query_as(
            "SELECT c.id, c.event_id, c.item_name, c.is_checked \
             FROM checklist_items c JOIN events e ON e.id = c.event_id \
             WHERE e.chat_id = ? ORDER BY c.id",
        )
        .bind(chat_id.0)
        .fetch_all(self.pool())
        .await?;

        let mut by_event: HashMap<i64, Vec<ChecklistItem>> = HashMap::new();
        for item in items {
            by_event.entry(item.event_id).or_default().push(item);
        }

        Ok(records
            .into_iter()
            .map(|event| StoredEvent {
                checklist: by_event.remove(&event.id).unwrap_or_default(),
                event,
            })
            .collect())
    }

    pub async fn get_event(&self, chat_id: ChatId, event_id: i64) -> Result<Option<StoredEvent>> {
        tracing::trace!(chat_id = chat_id.0, event_id, "Fetching event");
        let record: Option<EventRecord> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = ? AND chat_id = ?"
        ))
        .bind(event_id)
        .bind(chat_id.0)
        .fetch_optional(self.pool())
        .await?;

        let Some(event) = record else {
            return Ok(None);
        };
        let checklist = self.list_checklist(event.id).await?;
        Ok(Some(StoredEvent { event, checklist }))
    }

    /// Applies the set fields of `update`. Returns false when no such event.
    pub async fn update_event(
        &self,
        chat_id: ChatId,
        event_id: i64,
        update: &EventUpdate,
    ) -> Result<bool> {
        tracing::debug!(chat_id = chat_id.0, event_id, ?update, "Updating event");
        let result = sqlx::query(
            "UPDATE events SET \
             event_name = COALESCE(?, event_name), \
             event_date = COALESCE(?, event_date), \
             event_time = COALESCE(?, event_time), \
             country = COALESCE(?, country), \
             child_tag = COALESCE(?, child_tag), \
             memo = COALESCE(?, memo) \
             WHERE id = ? AND chat_id = ?",
        )
        .bind(update.event_name.as_deref())
        .bind(update.event_date.as_deref())
        .bind(update.event_time.as_deref())
        .bind(update.country.as_deref())
        .bind(update.child_tag.as_deref())
        .bind(update.memo.as_deref())
        .bind(event_id)
        .bind(chat_id.0)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes an event and its checklist. Returns false when no such event.
    pub async fn delete_event(&self, chat_id: ChatId, event_id: i64) -> Result<bool> {
        tracing::debug!(chat_id = chat_id.0, event_id, "Deleting event");
        let mut tx = self.pool().begin().await?;
        sqlx::query(
            "DELETE FROM checklist_items WHERE event_id IN \
             (SELECT id FROM events WHERE id = ? AND chat_id = ?)",
        )
        .bind(event_id)
        .bind(chat_id.0)
        .execute(&mut *tx)
        .await?;
        let result = sqlx::query("DELETE FROM events WHERE id = ? AND chat_id = ?")
            .bind(event_id)
            .bind(chat_id.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes every event, checklist item, child and setting of a chat.
    /// Returns the number of events deleted.
    pub async fn reset_chat(&self, chat_id: ChatId) -> Result<u64> {
        tracing::debug!(chat_id = chat_id.0, "Resetting chat data");
        let mut tx = self.pool().begin().await?;
        sqlx::query(
            "DELETE FROM checklist_items WHERE event_id IN \
             (SELECT id FROM events WHERE chat_id = ?)",
        )
        .bind(chat_id.0)
        .execute(&mut *tx)
        .await?;
        let events = sqlx::query("DELETE FROM events WHERE chat_id = ?")
            .bind(chat_id.0)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM children WHERE chat_id = ?")
            .bind(chat_id.0)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM chat_settings WHERE chat_id = ?")
            .bind(chat_id.0)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(events)
    }
}

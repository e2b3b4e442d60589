use anyhow::Result;
use teloxide::types::ChatId;

use super::types::{ChecklistChange, ChecklistItem};
use super::Database;
use crate::checklist::is_valid_checklist_item;

const OWNED_BY_CHAT: &str = "event_id IN (SELECT id FROM events WHERE chat_id = ?)";

impl Database {
    pub async fn list_checklist(&self, event_id: i64) -> Result<Vec<ChecklistItem>> {
        tracing::trace!(event_id, "Listing checklist");
        sqlx::query_as(
            "SELECT id, event_id, item_name, is_checked FROM checklist_items \
             WHERE event_id = ? ORDER BY id",
        )
        .bind(event_id)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }

    /// Appends an item to an event's checklist.
    ///
    /// Returns `None` when the text fails validation or the event does not
    /// belong to `chat_id`.
    pub async fn add_checklist_item(
        &self,
        chat_id: ChatId,
        event_id: i64,
        item_name: &str,
    ) -> Result<Option<i64>> {
        let item_name = item_name.trim();
        if !is_valid_checklist_item(item_name) {
            tracing::debug!(event_id, item_name, "Rejected checklist item");
            return Ok(None);
        }

        let result = sqlx::query(
            "INSERT INTO checklist_items (event_id, item_name) \
             SELECT id, ? FROM events WHERE id = ? AND chat_id = ?",
        )
        .bind(item_name)
        .bind(event_id)
        .bind(chat_id.0)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        let id = result.last_insert_rowid();
        tracing::trace!(chat_id = chat_id.0, event_id, item_id = id, "Added checklist item");
        Ok(Some(id))
    }

    pub async fn set_checklist_item(&self, chat_id: ChatId, item_id: i64, checked: bool) -> Result<bool> {
        tracing::trace!(chat_id = chat_id.0, item_id, checked, "Setting checklist item");
        let result = sqlx::query(&format!(
            "UPDATE checklist_items SET is_checked = ? WHERE id = ? AND {OWNED_BY_CHAT}"
        ))
        .bind(checked)
        .bind(item_id)
        .bind(chat_id.0)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flips the checked flag. Returns the owning event id and the new state.
    pub async fn toggle_checklist_item(
        &self,
        chat_id: ChatId,
        item_id: i64,
    ) -> Result<Option<(i64, bool)>> {
        tracing::trace!(chat_id = chat_id.0, item_id, "Toggling checklist item");
        sqlx::query_as(&format!(
            "UPDATE checklist_items SET is_checked = NOT is_checked \
             WHERE id = ? AND {OWNED_BY_CHAT} RETURNING event_id, is_checked"
        ))
        .bind(item_id)
        .bind(chat_id.0)
        .fetch_optional(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn rename_checklist_item(
        &self,
        chat_id: ChatId,
        item_id: i64,
        item_name: &str,
    ) -> Result<ChecklistChange> {
        let item_name = item_name.trim();
        if !is_valid_checklist_item(item_name) {
            return Ok(ChecklistChange::Rejected);
        }
        let result = sqlx::query(&format!(
            "UPDATE checklist_items SET item_name = ? WHERE id = ? AND {OWNED_BY_CHAT}"
        ))
        .bind(item_name)
        .bind(item_id)
        .bind(chat_id.0)
        .execute(self.pool())
        .await?;
        Ok(if result.rows_affected() > 0 {
            ChecklistChange::Applied
        } else {
            ChecklistChange::NotFound
        })
    }

    pub async fn delete_checklist_item(&self, chat_id: ChatId, item_id: i64) -> Result<bool> {
        tracing::trace!(chat_id = chat_id.0, item_id, "Deleting checklist item");
        let result = sqlx::query(&format!(
            "DELETE FROM checklist_items WHERE id = ? AND {OWNED_BY_CHAT}"
        ))
        .bind(item_id)
        .bind(chat_id.0)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

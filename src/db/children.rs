use anyhow::Result;
use teloxide::types::ChatId;

use super::Database;

/// Names created for a chat that has no children yet.
pub const DEFAULT_CHILDREN: [&str; 2] = ["첫째", "둘째"];

impl Database {
    /// Children of a chat in display order, seeding the defaults on first use.
    pub async fn list_children(&self, chat_id: ChatId) -> Result<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM children WHERE chat_id = ? ORDER BY display_order, id",
        )
        .bind(chat_id.0)
        .fetch_all(self.pool())
        .await?;
        if !names.is_empty() {
            return Ok(names);
        }

        tracing::debug!(chat_id = chat_id.0, "Seeding default children");
        for (order, name) in DEFAULT_CHILDREN.iter().enumerate() {
            sqlx::query(
                "INSERT OR IGNORE INTO children (chat_id, name, display_order) VALUES (?, ?, ?)",
            )
            .bind(chat_id.0)
            .bind(name)
            .bind(order as i64)
            .execute(self.pool())
            .await?;
        }
        Ok(DEFAULT_CHILDREN.iter().map(|s| s.to_string()).collect())
    }

    /// Adds a child at the end of the list. Returns false for a duplicate name.
    pub async fn add_child(&self, chat_id: ChatId, name: &str) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        // make sure the defaults exist before appending
        self.list_children(chat_id).await?;
        let result = sqlx::query(
            "INSERT OR IGNORE INTO children (chat_id, name, display_order) \
             SELECT ?, ?, COALESCE(MAX(display_order) + 1, 0) FROM children WHERE chat_id = ?",
        )
        .bind(chat_id.0)
        .bind(name)
        .bind(chat_id.0)
        .execute(self.pool())
        .await?;
        tracing::debug!(chat_id = chat_id.0, name, added = result.rows_affected() > 0, "Adding child");
        Ok(result.rows_affected() > 0)
    }

    /// Renames a child and retags its events. False when the old name is
    /// unknown or the new one is taken.
    pub async fn rename_child(&self, chat_id: ChatId, old: &str, new: &str) -> Result<bool> {
        let new = new.trim();
        if new.is_empty() {
            return Ok(false);
        }
        let mut tx = self.pool().begin().await?;
        let renamed = sqlx::query("UPDATE OR IGNORE children SET name = ? WHERE chat_id = ? AND name = ?")
            .bind(new)
            .bind(chat_id.0)
            .bind(old)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if renamed == 0 {
            return Ok(false);
        }
        let retagged = sqlx::query("UPDATE events SET child_tag = ? WHERE chat_id = ? AND child_tag = ?")
            .bind(new)
            .bind(chat_id.0)
            .bind(old)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        tracing::debug!(chat_id = chat_id.0, old, new, retagged, "Renamed child");
        Ok(true)
    }

    /// Removes a child. Its events keep their tag.
    pub async fn delete_child(&self, chat_id: ChatId, name: &str) -> Result<bool> {
        tracing::debug!(chat_id = chat_id.0, name, "Deleting child");
        let result = sqlx::query("DELETE FROM children WHERE chat_id = ? AND name = ?")
            .bind(chat_id.0)
            .bind(name)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use super::Database;
use anyhow::Result;
use teloxide::types::ChatId;

impl Database {
    /// Country key chosen for a chat, if any.
    pub async fn get_country(&self, chat_id: ChatId) -> Result<Option<String>> {
        tracing::trace!(chat_id = chat_id.0, "Fetching chat country");
        sqlx::query_scalar("SELECT country FROM chat_settings WHERE chat_id = ?")
            .bind(chat_id.0)
            .fetch_optional(self.pool())
            .await
            .map_err(Into::into)
    }

    pub async fn set_country(&self, chat_id: ChatId, country: &str) -> Result<()> {
        tracing::debug!(chat_id = chat_id.0, country, "Updating chat country");
        sqlx::query(
            "INSERT INTO chat_settings (chat_id, country) VALUES (?, ?) \
             ON CONFLICT(chat_id) DO UPDATE SET country = excluded.country",
        )
        .bind(chat_id.0)
        .bind(country)
        .execute(self.pool())
        .await?;
        Ok(())
    }
}

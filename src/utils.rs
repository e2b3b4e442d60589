use anyhow::Result;
use futures_util::StreamExt;
use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatId, InlineKeyboardMarkup, MessageId},
    ApiError, RequestError,
};

/// Default timeout in seconds for transient notices.
pub const DEFAULT_DELETE_AFTER_TIMEOUT: u64 = 10;

/// Delete a message after the given delay in seconds.
pub fn delete_after(
    bot: Bot,
    chat_id: ChatId,
    message_id: MessageId,
    secs: u64,
) -> tokio::task::JoinHandle<()> {
    tracing::debug!(
        chat_id = chat_id.0,
        message_id = message_id.0,
        delay_secs = secs,
        "Scheduling message deletion"
    );
    tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
        try_delete_message(&bot, chat_id, message_id).await;
    })
}

/// Attempt to delete a message and log a warning on failure.
pub async fn try_delete_message(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    if let Err(err) = bot.delete_message(chat_id, message_id).await {
        tracing::warn!(
            error = %err,
            chat_id = chat_id.0,
            message_id = message_id.0,
            "Failed to delete message",
        );
    }
}

/// Attempt to edit a message. An unchanged message is not an error.
pub async fn try_edit_message(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: impl Into<String>,
    markup: InlineKeyboardMarkup,
) {
    match bot
        .edit_message_text(chat_id, message_id, text)
        .reply_markup(markup)
        .await
    {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => {}
        Err(err) => tracing::warn!(
            error = %err,
            chat_id = chat_id.0,
            message_id = message_id.0,
            "Failed to edit message",
        ),
    }
}

/// Fetch a Telegram file by its `file_id` and return the raw bytes.
pub async fn download_telegram_file(bot: &Bot, file_id: &str) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    tracing::debug!(path = %file.path, size = file.size, "Downloading Telegram file");
    let mut data = Vec::with_capacity(file.size as usize);
    let mut stream = bot.download_file_stream(&file.path);
    while let Some(chunk) = stream.next().await {
        data.extend_from_slice(&chunk?);
    }
    tracing::trace!(path = %file.path, size = data.len(), "Finished download");
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::Client;
    use teloxide::types::InlineKeyboardButton;
    use wiremock::{
        matchers::{method, path, path_regex},
        Mock, MockServer, ResponseTemplate,
    };

    fn test_bot(server: &MockServer) -> Bot {
        let client = Client::builder().no_proxy().build().unwrap();
        Bot::with_client("TEST", client).set_api_url(reqwest::Url::parse(&server.uri()).unwrap())
    }

    #[tokio::test]
    async fn try_delete_message_sends_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/botTEST/[Dd]eleteMessage$"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"ok":true,"result":true}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        try_delete_message(&test_bot(&server), ChatId(1), MessageId(2)).await;
        server.verify().await;
    }

    #[tokio::test]
    async fn try_edit_message_tolerates_unmodified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/botTEST/[Ee]ditMessageText$"))
            .respond_with(ResponseTemplate::new(400).set_body_raw(
                r#"{"ok":false,"error_code":400,"description":"Bad Request: message is not modified: specified new message content and reply markup are exactly the same as a current content and reply markup of the message"}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let markup = InlineKeyboardMarkup::new(Vec::<Vec<InlineKeyboardButton>>::new());
        try_edit_message(&test_bot(&server), ChatId(1), MessageId(2), "같은 내용", markup).await;
        server.verify().await;
    }

    #[tokio::test]
    async fn download_telegram_file_gets_bytes() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/botTEST/[Gg]etFile$"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"ok":true,"result":{"file_id":"f","file_unique_id":"u","file_size":5,"file_path":"photos/notice.jpg"}}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/file/botTEST/photos/notice.jpg"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("\u{ff}\u{d8}jpg", "application/octet-stream"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let bytes = download_telegram_file(&test_bot(&server), "f").await?;
        assert_eq!(bytes, "\u{ff}\u{d8}jpg".as_bytes());
        server.verify().await;
        Ok(())
    }
}

use anyhow::Result;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::ai::AiConfig;
use crate::config::BotSettings;
use crate::db::{self, EventFilter};
use crate::handlers::{help, show_or_set_country, show_system_info, EventService};

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "지원하는 명령어:")]
pub enum Command {
    #[command(description = "도움말 보기.")]
    Start,
    #[command(description = "도움말 보기.")]
    Help,
    #[command(description = "현재 국가 확인 또는 변경.")]
    Country(String),
    #[command(description = "다가오는 행사 보기.")]
    Events,
    #[command(description = "저장된 모든 행사 보기.")]
    All,
    #[command(description = "행사 삭제 (번호 입력).")]
    Delete(String),
    #[command(description = "이 대화의 모든 데이터 삭제.")]
    Reset,
    #[command(description = "시스템 정보 보기.")]
    Info,
}

impl Command {
    pub async fn dispatch(
        self,
        bot: Bot,
        msg: Message,
        db: db::Database,
        ai_config: Option<AiConfig>,
        settings: BotSettings,
    ) -> Result<()> {
        tracing::debug!(chat_id = msg.chat.id.0, command = ?self, "Handling command");
        let service = EventService::new(&db);
        match self {
            Command::Start | Command::Help => help(bot, msg).await?,
            Command::Country(arg) => {
                show_or_set_country(bot, msg, db.clone(), settings, arg).await?
            }
            Command::Events => {
                let today = chrono::Local::now().date_naive();
                service
                    .send_events(bot, msg.chat.id, EventFilter::Upcoming(today))
                    .await?
            }
            Command::All => service.send_events(bot, msg.chat.id, EventFilter::All).await?,
            Command::Delete(arg) => {
                service
                    .delete(bot, msg, &arg, settings.delete_after_timeout)
                    .await?
            }
            Command::Reset => service.reset(bot, msg, settings.delete_after_timeout).await?,
            Command::Info => show_system_info(bot, msg, ai_config).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            Command::parse("/country 미국", "bot").unwrap(),
            Command::Country("미국".into())
        );
        assert_eq!(
            Command::parse("/country", "bot").unwrap(),
            Command::Country(String::new())
        );
        assert_eq!(
            Command::parse("/delete 12", "bot").unwrap(),
            Command::Delete("12".into())
        );
        assert_eq!(Command::parse("/events", "bot").unwrap(), Command::Events);
        assert!(Command::parse("/list", "bot").is_err());
    }
}

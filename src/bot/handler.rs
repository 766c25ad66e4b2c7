use crate::bot::callback::CallbackEvent;
use crate::bot::notifier::ThrottledBot;
use crate::bot::Command;
use crate::db::repo::Repo;
use crate::scheduler::summary;
use crate::wallpaper::WallpaperService;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};

const GENERIC_ERROR_TEXT: &str = "⚠️ Something went wrong, please try again later.";

const HELP_TEXT: &str = "Every morning you get a menu of wallpaper categories. \
Pick one and the bot sends you a fresh wallpaper you have not seen before, \
one per day. In the evening it asks whether you set it as your wallpaper.";

#[derive(Clone)]
pub struct BotHandler {
    service: Arc<WallpaperService>,
    repo: Arc<Repo>,
    operator_ids: Arc<Vec<i64>>,
}

impl BotHandler {
    pub fn new(service: Arc<WallpaperService>, repo: Arc<Repo>, operator_ids: Vec<i64>) -> Self {
        Self {
            service,
            repo,
            operator_ids: Arc::new(operator_ids),
        }
    }

    fn is_operator(&self, user_id: i64) -> bool {
        self.operator_ids.contains(&user_id)
    }

    pub async fn handle_command(
        &self,
        bot: ThrottledBot,
        msg: Message,
        cmd: Command,
    ) -> ResponseResult<()> {
        let chat_id = msg.chat.id;
        let Some(user_id) = msg.from.as_ref().map(|u| u.id.0 as i64) else {
            return Ok(());
        };

        info!(
            "Received command from user {} in chat {}: {:?}",
            user_id, chat_id, cmd
        );

        match cmd {
            Command::Start => {
                if let Err(e) = self.service.start(user_id).await {
                    error!("Failed to register user {}: {:#}", user_id, e);
                    bot.send_message(chat_id, GENERIC_ERROR_TEXT).await?;
                }
            }
            Command::Help => {
                let text = format!("{}\n\n{}", HELP_TEXT, Command::descriptions());
                bot.send_message(chat_id, text).await?;
            }
            Command::Stats => {
                if !self.is_operator(user_id) {
                    info!("User {} attempted to use Stats without permission", user_id);
                    return Ok(()); // Silently ignore
                }
                match summary::build_summary(&self.repo).await {
                    Ok(report) => {
                        bot.send_message(chat_id, report.render())
                            .parse_mode(ParseMode::MarkdownV2)
                            .await?;
                    }
                    Err(e) => {
                        error!("Failed to build summary: {:#}", e);
                        bot.send_message(chat_id, GENERIC_ERROR_TEXT).await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Route an inline button press. The query is always acknowledged.
    pub async fn handle_callback(&self, bot: ThrottledBot, q: CallbackQuery) -> ResponseResult<()> {
        bot.answer_callback_query(q.id.clone()).await?;

        let user_id = q.from.id.0 as i64;
        let Some(event) = q.data.as_deref().and_then(CallbackEvent::parse) else {
            warn!(
                "Ignoring unknown callback data from user {}: {:?}",
                user_id, q.data
            );
            return Ok(());
        };

        info!("Callback from user {}: {:?}", user_id, event);

        let result = match &event {
            CallbackEvent::CategoryOpened { category } => {
                self.service.open_category(user_id, category).await
            }
            CallbackEvent::UsageAnswered { used } => self.service.answer_usage(user_id, *used).await,
            CallbackEvent::CategoryChosen { .. } | CallbackEvent::SubcategoryChosen { .. } => {
                match event.selection() {
                    Some(selection) => self.service.choose(user_id, &selection).await.map(|_| ()),
                    None => Ok(()),
                }
            }
        };

        if let Err(e) = result {
            error!("Failed to handle {:?} for user {}: {:#}", event, user_id, e);
            bot.send_message(ChatId(user_id), GENERIC_ERROR_TEXT).await?;
        }

        Ok(())
    }
}

use crate::bot::menu::Menu;
use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::adaptors::Throttle;
use teloxide::prelude::*;
use teloxide::types::{InputFile, ParseMode};
use tracing::info;

/// Bot with Telegram's per-chat and global rate limits applied
pub type ThrottledBot = Throttle<Bot>;

/// Outbound side of the bot, kept behind a trait so jobs and handlers can be
/// exercised without Telegram.
#[async_trait]
pub trait ChatSender: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;

    async fn send_menu(&self, chat_id: i64, text: &str, menu: &Menu) -> Result<()>;

    async fn send_photo(&self, chat_id: i64, url: &str) -> Result<()>;

    async fn send_document(&self, chat_id: i64, url: &str) -> Result<()>;

    /// Text already escaped for MarkdownV2
    async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct Notifier {
    bot: ThrottledBot,
}

impl Notifier {
    pub fn new(bot: ThrottledBot) -> Self {
        Self { bot }
    }

    fn parse_url(url: &str) -> Result<reqwest::Url> {
        reqwest::Url::parse(url).with_context(|| format!("Invalid image URL: {}", url))
    }
}

#[async_trait]
impl ChatSender for Notifier {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .context("Failed to send Telegram message")?;
        Ok(())
    }

    async fn send_menu(&self, chat_id: i64, text: &str, menu: &Menu) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .reply_markup(menu.to_keyboard())
            .await
            .context("Failed to send menu")?;
        Ok(())
    }

    async fn send_photo(&self, chat_id: i64, url: &str) -> Result<()> {
        info!("Sending photo to chat {}: {}", chat_id, url);

        let input_file = InputFile::url(Self::parse_url(url)?);
        self.bot
            .send_photo(ChatId(chat_id), input_file)
            .await
            .context("Failed to send photo")?;
        Ok(())
    }

    async fn send_document(&self, chat_id: i64, url: &str) -> Result<()> {
        info!("Sending document to chat {}: {}", chat_id, url);

        let input_file = InputFile::url(Self::parse_url(url)?);
        self.bot
            .send_document(ChatId(chat_id), input_file)
            .await
            .context("Failed to send document")?;
        Ok(())
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
            .context("Failed to send MarkdownV2 message")?;
        Ok(())
    }
}

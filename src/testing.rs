//! Fakes for the provider and chat seams

use crate::bot::menu::Menu;
use crate::bot::notifier::ChatSender;
use crate::unsplash::{FetchedImage, ImageProvider};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// Hands out the configured batches in order, then empty batches
pub struct StubProvider {
    batches: Mutex<VecDeque<Vec<FetchedImage>>>,
    queries: Mutex<Vec<(String, u32)>>,
}

impl StubProvider {
    pub fn new(batches: Vec<Vec<FetchedImage>>) -> Self {
        Self {
            batches: Mutex::new(batches.into()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<(String, u32)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageProvider for StubProvider {
    async fn fetch_batch(&self, query: &str, count: u32) -> Vec<FetchedImage> {
        self.queries.lock().unwrap().push((query.to_string(), count));
        self.batches.lock().unwrap().pop_front().unwrap_or_default()
    }
}

/// Returns a distinct image per call, with ids derived from the query
pub struct EchoProvider;

#[async_trait]
impl ImageProvider for EchoProvider {
    async fn fetch_batch(&self, query: &str, count: u32) -> Vec<FetchedImage> {
        (0..count)
            .map(|i| FetchedImage {
                id: format!("{}-{}", query, i),
                url: format!("https://images.example/{}/{}", query.replace(' ', "_"), i),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text { chat_id: i64, text: String },
    Menu { chat_id: i64, text: String, menu: Menu },
    Photo { chat_id: i64, url: String },
    Document { chat_id: i64, url: String },
    Markdown { chat_id: i64, text: String },
}

impl Sent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Sent::Text { chat_id, .. }
            | Sent::Menu { chat_id, .. }
            | Sent::Photo { chat_id, .. }
            | Sent::Document { chat_id, .. }
            | Sent::Markdown { chat_id, .. } => *chat_id,
        }
    }
}

/// Records every outbound message; chats marked as failing get an error instead
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<Sent>>,
    failing: Mutex<HashSet<i64>>,
    failing_documents: Mutex<bool>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, chat_id: i64) {
        self.failing.lock().unwrap().insert(chat_id);
    }

    /// Make every document upload fail while photos still go through
    pub fn fail_documents(&self) {
        *self.failing_documents.lock().unwrap() = true;
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, chat_id: i64) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| s.chat_id() == chat_id)
            .collect()
    }

    /// Plain texts sent to `chat_id`
    pub fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.sent_to(chat_id)
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, chat_id: i64, sent: Sent) -> Result<()> {
        if self.failing.lock().unwrap().contains(&chat_id) {
            bail!("chat {} is unreachable", chat_id);
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.record(
            chat_id,
            Sent::Text {
                chat_id,
                text: text.to_string(),
            },
        )
    }

    async fn send_menu(&self, chat_id: i64, text: &str, menu: &Menu) -> Result<()> {
        self.record(
            chat_id,
            Sent::Menu {
                chat_id,
                text: text.to_string(),
                menu: menu.clone(),
            },
        )
    }

    async fn send_photo(&self, chat_id: i64, url: &str) -> Result<()> {
        self.record(
            chat_id,
            Sent::Photo {
                chat_id,
                url: url.to_string(),
            },
        )
    }

    async fn send_document(&self, chat_id: i64, url: &str) -> Result<()> {
        if *self.failing_documents.lock().unwrap() {
            bail!("document upload rejected");
        }
        self.record(
            chat_id,
            Sent::Document {
                chat_id,
                url: url.to_string(),
            },
        )
    }

    async fn send_markdown(&self, chat_id: i64, text: &str) -> Result<()> {
        self.record(
            chat_id,
            Sent::Markdown {
                chat_id,
                text: text.to_string(),
            },
        )
    }
}

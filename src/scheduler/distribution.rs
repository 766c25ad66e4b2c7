use crate::bot::menu;
use crate::bot::notifier::ChatSender;
use crate::db::repo::Repo;
use crate::scheduler::engine::DailyJob;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

pub const MORNING_TEXT: &str = "Good morning! Choose a category for today's wallpaper:";
pub const USAGE_PROMPT_TEXT: &str = "Would you set this image as your wallpaper?";

/// Delivery counts of one broadcast
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

/// Sends every known user the category menu of their cohort
pub struct MorningDistribution {
    repo: Arc<Repo>,
    sender: Arc<dyn ChatSender>,
}

impl MorningDistribution {
    pub fn new(repo: Arc<Repo>, sender: Arc<dyn ChatSender>) -> Self {
        Self { repo, sender }
    }

    pub async fn distribute(&self) -> Result<BroadcastReport> {
        let users = self
            .repo
            .list_users()
            .await
            .context("Failed to load users for morning distribution")?;

        info!("Sending morning menu to {} users", users.len());

        let mut report = BroadcastReport::default();
        for user in users {
            let menu = menu::category_menu(user.cohort);
            match self.sender.send_menu(user.id, MORNING_TEXT, &menu).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("Error sending morning prompt to user {}: {:#}", user.id, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl DailyJob for MorningDistribution {
    fn name(&self) -> &'static str {
        "Morning distribution"
    }

    async fn execute(&self) -> Result<()> {
        let report = self.distribute().await?;
        info!(
            "Morning menu sent to {} users ({} failed)",
            report.sent, report.failed
        );
        Ok(())
    }
}

/// Asks users who received a wallpaper whether they used it
pub struct UsagePrompt {
    repo: Arc<Repo>,
    sender: Arc<dyn ChatSender>,
}

impl UsagePrompt {
    pub fn new(repo: Arc<Repo>, sender: Arc<dyn ChatSender>) -> Self {
        Self { repo, sender }
    }

    pub async fn prompt(&self) -> Result<BroadcastReport> {
        let users = self
            .repo
            .list_users_with_received()
            .await
            .context("Failed to load users for usage prompt")?;

        info!("Sending usage prompt to {} users", users.len());

        let menu = menu::usage_menu();
        let mut report = BroadcastReport::default();
        for user in users {
            match self.sender.send_menu(user.id, USAGE_PROMPT_TEXT, &menu).await {
                Ok(()) => report.sent += 1,
                Err(e) => {
                    error!("Error prompting user {}: {:#}", user.id, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

#[async_trait]
impl DailyJob for UsagePrompt {
    fn name(&self) -> &'static str {
        "Usage prompt"
    }

    async fn execute(&self) -> Result<()> {
        let report = self.prompt().await?;
        info!(
            "Usage prompt sent to {} users ({} failed)",
            report.sent, report.failed
        );
        Ok(())
    }
}

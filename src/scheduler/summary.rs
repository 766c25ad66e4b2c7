use crate::bot::notifier::ChatSender;
use crate::db::repo::{CohortUsage, Repo};
use crate::db::types::Cohort;
use crate::scheduler::engine::DailyJob;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use teloxide::utils::markdown;
use tracing::{error, info};

/// Received/used counters of a group of users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageTotals {
    pub received: i64,
    pub used: i64,
}

impl UsageTotals {
    /// Percentage of received wallpapers that were used, 0 when nothing was received
    pub fn rate(&self) -> f64 {
        if self.received > 0 {
            self.used as f64 / self.received as f64 * 100.0
        } else {
            0.0
        }
    }

    fn combined(self, other: UsageTotals) -> Self {
        Self {
            received: self.received + other.received,
            used: self.used + other.used,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryReport {
    pub narrow: UsageTotals,
    pub wide: UsageTotals,
}

impl SummaryReport {
    pub fn from_usage(usage: &[CohortUsage]) -> Self {
        let mut report = Self::default();
        for row in usage {
            let totals = UsageTotals {
                received: row.received,
                used: row.used,
            };
            match row.cohort {
                Cohort::Narrow => report.narrow = totals,
                Cohort::Wide => report.wide = totals,
            }
        }
        report
    }

    pub fn overall(&self) -> UsageTotals {
        self.narrow.combined(self.wide)
    }

    /// MarkdownV2 text for operators
    pub fn render(&self) -> String {
        let overall = self.overall();
        format!(
            "📊 *Daily Summary:*\n\n\
             *Narrow Group:*\n{}\n\n\
             *Wide Group:*\n{}\n\n\
             *Overall Statistics:*\n{}",
            render_totals(&self.narrow),
            render_totals(&self.wide),
            render_totals(&overall),
        )
    }
}

fn render_totals(totals: &UsageTotals) -> String {
    format!(
        "  📌 Wallpapers Received: {}\n  ✅ Wallpapers Used: {}\n  📈 Usage Rate: {}",
        totals.received,
        totals.used,
        markdown::escape(&format!("{:.2}%", totals.rate()))
    )
}

pub async fn build_summary(repo: &Repo) -> Result<SummaryReport> {
    let usage = repo
        .usage_by_cohort()
        .await
        .context("Failed to aggregate usage")?;
    Ok(SummaryReport::from_usage(&usage))
}

/// Sends the per-cohort usage summary to every operator
pub struct DailySummary {
    repo: Arc<Repo>,
    sender: Arc<dyn ChatSender>,
    operator_ids: Vec<i64>,
}

impl DailySummary {
    pub fn new(repo: Arc<Repo>, sender: Arc<dyn ChatSender>, operator_ids: Vec<i64>) -> Self {
        Self {
            repo,
            sender,
            operator_ids,
        }
    }

    /// Returns how many operators were reached
    pub async fn send_summary(&self) -> Result<usize> {
        let text = build_summary(&self.repo).await?.render();

        let mut delivered = 0;
        for &operator_id in &self.operator_ids {
            match self.sender.send_markdown(operator_id, &text).await {
                Ok(()) => delivered += 1,
                Err(e) => error!("Error sending summary to operator {}: {:#}", operator_id, e),
            }
        }
        Ok(delivered)
    }
}

#[async_trait]
impl DailyJob for DailySummary {
    fn name(&self) -> &'static str {
        "Daily summary"
    }

    async fn execute(&self) -> Result<()> {
        if self.operator_ids.is_empty() {
            info!("No operators configured, skipping daily summary");
            return Ok(());
        }

        let delivered = self.send_summary().await?;
        info!(
            "Daily summary sent to {}/{} operators",
            delivered,
            self.operator_ids.len()
        );
        Ok(())
    }
}

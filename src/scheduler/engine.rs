use crate::scheduler::clock::next_run_after;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

/// A job that runs once a day at a fixed wall-clock time
#[async_trait]
pub trait DailyJob: Send + Sync {
    fn name(&self) -> &'static str;

    async fn execute(&self) -> Result<()>;
}

/// Drives one [`DailyJob`] forever on its own task
pub struct DailyScheduler {
    job: Arc<dyn DailyJob>,
    at: NaiveTime,
    timezone: Tz,
}

impl DailyScheduler {
    pub fn new(job: Arc<dyn DailyJob>, at: NaiveTime, timezone: Tz) -> Self {
        Self { job, at, timezone }
    }

    /// Main scheduler loop - runs indefinitely at the configured time daily
    pub async fn run(&self) {
        info!(
            "🚀 {} job started (execution time: {} {})",
            self.job.name(),
            self.at.format("%H:%M"),
            self.timezone
        );

        loop {
            let now = Utc::now().with_timezone(&self.timezone);
            let next_execution = next_run_after(&now, self.at);
            let duration_until_execution = (next_execution - now).to_std().unwrap_or_default();

            info!(
                "⏰ Next {} execution at: {} (in {} seconds)",
                self.job.name(),
                next_execution.format("%Y-%m-%d %H:%M:%S %Z"),
                duration_until_execution.as_secs()
            );

            sleep(duration_until_execution).await;

            info!("⚙️  Executing {} job", self.job.name());
            match self.job.execute().await {
                Ok(()) => info!("✅ {} job finished", self.job.name()),
                Err(e) => error!("{} job execution error: {:#}", self.job.name(), e),
            }

            // Sleep a bit to avoid executing twice in the same minute
            sleep(Duration::from_secs(60)).await;
        }
    }
}

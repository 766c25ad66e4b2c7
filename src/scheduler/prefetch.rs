use crate::db::repo::Repo;
use crate::scheduler::engine::DailyJob;
use crate::scheduler::rate_limiter::RateLimiter;
use crate::unsplash::ImageProvider;
use crate::wallpaper::taxonomy;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Outcome of one walk over the taxonomy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchReport {
    pub requests: u32,
    pub images_inserted: u64,
    pub empty_batches: u32,
    pub cooldowns: u32,
}

/// Nightly cache refill: one provider request per taxonomy leaf, paced by a
/// [`RateLimiter`].
pub struct PrefetchEngine {
    repo: Arc<Repo>,
    provider: Arc<dyn ImageProvider>,
    limiter: Mutex<RateLimiter>,
    batch_size: u32,
}

impl PrefetchEngine {
    pub fn new(
        repo: Arc<Repo>,
        provider: Arc<dyn ImageProvider>,
        limiter: RateLimiter,
        batch_size: u32,
    ) -> Self {
        Self {
            repo,
            provider,
            limiter: Mutex::new(limiter),
            batch_size,
        }
    }

    pub async fn run_prefetch(&self) -> PrefetchReport {
        let leaves = taxonomy::leaves();
        info!("Prefetching images for {} categories", leaves.len());

        let mut limiter = self.limiter.lock().await;
        let mut report = PrefetchReport::default();

        for selection in leaves {
            if limiter.wait_for_slot().await {
                report.cooldowns += 1;
            }

            let category_key = selection.category_key();
            let batch = self
                .provider
                .fetch_batch(selection.query(), self.batch_size)
                .await;
            limiter.record_request();
            report.requests += 1;

            if batch.is_empty() {
                report.empty_batches += 1;
                continue;
            }

            match self.repo.add_images(&category_key, &batch).await {
                Ok(inserted) => report.images_inserted += inserted,
                Err(e) => error!("Failed to cache images for '{}': {:#}", category_key, e),
            }
        }

        report
    }
}

#[async_trait]
impl DailyJob for PrefetchEngine {
    fn name(&self) -> &'static str {
        "Prefetch"
    }

    async fn execute(&self) -> Result<()> {
        let report = self.run_prefetch().await;
        info!(
            "Prefetch finished: {} requests, {} new images, {} empty batches, {} cooldowns",
            report.requests, report.images_inserted, report.empty_batches, report.cooldowns
        );
        Ok(())
    }
}

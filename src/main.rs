mod bot;
mod config;
mod db;
mod scheduler;
#[cfg(test)]
mod testing;
mod unsplash;
mod wallpaper;

use crate::bot::notifier::{ChatSender, Notifier};
use crate::config::{parse_daily_time, Config};
use crate::scheduler::{
    DailyJob, DailyScheduler, DailySummary, MorningDistribution, PrefetchEngine, RateLimiter,
    UsagePrompt,
};
use crate::unsplash::ImageProvider;
use anyhow::{Context, Result};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;
use teloxide::adaptors::throttle::Limits;
use teloxide::requests::RequesterExt;
use tracing::{error, info};
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::load()?;

    let log_level = config.log_level();
    let log_dir = &config.logging.dir;

    // Create log directory if it doesn't exist
    std::fs::create_dir_all(log_dir)?;

    // Setup file appender (daily rotation)
    let file_appender = tracing_appender::rolling::daily(log_dir, "wallbot.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Use local time for log timestamps
    let local_timer = ChronoLocal::rfc_3339();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_file(true)
        .with_target(false)
        .with_timer(local_timer.clone());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_timer(local_timer)
        .with_writer(non_blocking);

    let filter_layer = EnvFilter::from_default_env()
        .add_directive(log_level.into())
        .add_directive("sqlx=warn".parse()?)
        .add_directive("sea_orm=warn".parse()?);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Starting WallBot...");
    info!("Logs are written to: {}", log_dir);

    // Resolve the daily clock before touching anything external
    let scheduler_config = config.scheduler.clone();
    let timezone = scheduler_config.timezone()?;
    let prefetch_at = parse_daily_time(&scheduler_config.prefetch_time)?;
    let morning_at = parse_daily_time(&scheduler_config.morning_time)?;
    let usage_prompt_at = parse_daily_time(&scheduler_config.usage_prompt_time)?;
    let summary_at = parse_daily_time(&scheduler_config.summary_time)?;

    // Connect to database
    let db = db::establish_connection(&config.database.url).await?;
    info!("Database connection established");

    migration::Migrator::up(&db, None)
        .await
        .context("Failed to run database migrations")?;
    info!("✅ Database migrations completed");

    let repo = Arc::new(db::repo::Repo::new(db));
    repo.ping().await?;
    info!("✅ Database ping successful");

    let provider: Arc<dyn ImageProvider> =
        Arc::new(unsplash::UnsplashProvider::new(&config.unsplash)?);
    info!("✅ Unsplash provider initialized");

    // Initialize Telegram Bot
    let mut raw_bot = teloxide::Bot::new(config.telegram.bot_token.clone());
    if let Some(api_url) = &config.telegram.api_url {
        let url = reqwest::Url::parse(api_url)
            .with_context(|| format!("Invalid telegram.api_url '{}'", api_url))?;
        raw_bot = raw_bot.set_api_url(url);
    }
    let bot = raw_bot.throttle(Limits::default());
    let sender: Arc<dyn ChatSender> = Arc::new(Notifier::new(bot.clone()));

    let selector = Arc::new(wallpaper::ImageSelector::new(
        repo.clone(),
        provider.clone(),
        scheduler_config.batch_size,
    ));
    let service = Arc::new(wallpaper::WallpaperService::new(
        repo.clone(),
        selector,
        sender.clone(),
        scheduler_config.throttle(),
    ));

    let operator_ids = config.telegram.operator_ids.clone();
    if operator_ids.is_empty() {
        info!("No operators configured, daily summaries will not be sent");
    }

    // One task per daily job
    let limiter = RateLimiter::new(
        scheduler_config.max_requests_per_window,
        scheduler_config.rate_window(),
        scheduler_config.cooldown(),
    );
    let prefetch: Arc<dyn DailyJob> = Arc::new(PrefetchEngine::new(
        repo.clone(),
        provider,
        limiter,
        scheduler_config.batch_size,
    ));
    let morning: Arc<dyn DailyJob> = Arc::new(MorningDistribution::new(repo.clone(), sender.clone()));
    let usage_prompt: Arc<dyn DailyJob> = Arc::new(UsagePrompt::new(repo.clone(), sender.clone()));
    let summary: Arc<dyn DailyJob> = Arc::new(DailySummary::new(
        repo.clone(),
        sender.clone(),
        operator_ids.clone(),
    ));

    let jobs = vec![
        (prefetch, prefetch_at),
        (morning, morning_at),
        (usage_prompt, usage_prompt_at),
        (summary, summary_at),
    ];

    let scheduler_handles: Vec<_> = jobs
        .into_iter()
        .map(|(job, at)| {
            let scheduler = DailyScheduler::new(job, at, timezone);
            tokio::spawn(async move {
                scheduler.run().await;
            })
        })
        .collect();

    info!("✅ Scheduler initialized ({} daily jobs)", scheduler_handles.len());

    // Setup Ctrl+C handler
    let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }
        info!("Received Ctrl+C, shutting down...");
        let _ = shutdown_tx.send(()).await;
    });

    // Start Bot in a separate task (non-blocking)
    let handler = bot::BotHandler::new(service, repo, operator_ids.clone());
    let bot_handle = tokio::spawn(async move {
        if let Err(e) = bot::run(bot, handler, operator_ids).await {
            error!("Bot error: {:?}", e);
        }
    });

    info!("🤖 WallBot initialization complete");

    // Wait for shutdown signal
    shutdown_rx.recv().await;
    info!("Shutting down gracefully...");

    bot_handle.abort();
    for handle in scheduler_handles {
        handle.abort();
    }

    info!("✅ Shutdown complete");
    Ok(())
}

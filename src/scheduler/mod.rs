mod clock;
mod distribution;
mod engine;
mod prefetch;
mod rate_limiter;
pub mod summary;

pub use distribution::{MorningDistribution, UsagePrompt};
pub use engine::{DailyJob, DailyScheduler};
pub use prefetch::PrefetchEngine;
pub use rate_limiter::RateLimiter;
pub use summary::DailySummary;

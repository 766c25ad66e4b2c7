use tokio::time::{sleep, Duration, Instant};
use tracing::warn;

/// Requests issued in the current window
#[derive(Debug, Clone, Copy)]
pub struct RateLimiterState {
    pub count: u32,
    pub window_start: Instant,
}

/// Caps provider requests per rolling window, pausing for a fixed cooldown
/// once the cap is reached.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    cooldown: Duration,
    state: RateLimiterState,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration, cooldown: Duration) -> Self {
        Self {
            max_requests,
            window,
            cooldown,
            state: RateLimiterState {
                count: 0,
                window_start: Instant::now(),
            },
        }
    }

    /// Wait until another request may be issued.
    ///
    /// Returns `true` when the cap was hit and the limiter cooled down.
    pub async fn wait_for_slot(&mut self) -> bool {
        if self.state.count >= self.max_requests {
            warn!(
                "Reached {} requests, cooling down for {} seconds",
                self.state.count,
                self.cooldown.as_secs()
            );
            sleep(self.cooldown).await;
            self.reset();
            return true;
        }

        if self.state.window_start.elapsed() > self.window {
            self.reset();
        }
        false
    }

    pub fn record_request(&mut self) {
        self.state.count += 1;
    }

    #[cfg(test)]
    pub fn state(&self) -> RateLimiterState {
        self.state
    }

    fn reset(&mut self) {
        self.state = RateLimiterState {
            count: 0,
            window_start: Instant::now(),
        };
    }
}

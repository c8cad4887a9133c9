//! Shared request budget.
//!
//! Every outbound request, ranking page or equipment lookup, is admitted
//! through one [`RateLimiter`] so both kinds draw from the same pool:
//!
//! - at most `ceiling` admissions per `window`; when the counter fills, the
//!   caller sleeps until the window has elapsed, then the counter resets
//! - consecutive admissions are at least `window / ceiling` apart

use std::time::Duration;

use tokio::time::{Instant, sleep, sleep_until};

/// Fixed-window request gate with a per-call spacing floor.
#[derive(Debug)]
pub struct RateLimiter {
    ceiling: u32,
    window: Duration,
    spacing: Duration,
    window_start: Instant,
    count: u32,
    last_admit: Option<Instant>,
    started: Instant,
    total: u64,
}

impl RateLimiter {
    /// Create a limiter admitting `ceiling` requests per `window`.
    ///
    /// A zero ceiling is treated as one.
    pub fn new(ceiling: u32, window: Duration) -> Self {
        let ceiling = ceiling.max(1);
        let now = Instant::now();
        Self {
            ceiling,
            window,
            spacing: window / ceiling,
            window_start: now,
            count: 0,
            last_admit: None,
            started: now,
            total: 0,
        }
    }

    /// Wait until one more request may be sent, then count it.
    pub async fn admit(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.window_start);

        if self.count >= self.ceiling {
            if elapsed < self.window {
                log::debug!(
                    "Rate limit reached ({} requests), sleeping {:?}",
                    self.count,
                    self.window - elapsed
                );
                sleep(self.window - elapsed).await;
            }
            self.window_start = Instant::now();
            self.count = 0;
        } else if elapsed >= self.window {
            self.window_start = now;
            self.count = 0;
        }

        if let Some(last) = self.last_admit {
            let next = last + self.spacing;
            if next > Instant::now() {
                sleep_until(next).await;
            }
        }

        self.last_admit = Some(Instant::now());
        self.count += 1;
        self.total += 1;
    }

    /// Requests admitted since the limiter was created.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Average admitted requests per minute since creation.
    pub fn requests_per_minute(&self) -> f64 {
        let minutes = self.started.elapsed().as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.total as f64 / minutes
        } else {
            self.total as f64
        }
    }
}

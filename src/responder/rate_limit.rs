//! Fixed-window rate limiter shared by every incoming message.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Sliding log of recent response slots.
///
/// Every message the bot sees asks for a slot before any pattern
/// matching happens. Timestamps older than the window are evicted on
/// each call, so the log never grows beyond `max` entries.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max: usize,
    log: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(max: usize, window: Duration) -> Self {
        Self {
            window,
            max,
            log: VecDeque::with_capacity(max),
        }
    }

    /// Claim a slot at `now`. Returns false when the window is full,
    /// in which case nothing is recorded and the caller stays silent.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        while self
            .log
            .front()
            .is_some_and(|&oldest| now.duration_since(oldest) > self.window)
        {
            self.log.pop_front();
        }

        if self.log.len() < self.max {
            self.log.push_back(now);
            true
        } else {
            false
        }
    }
}

//! Sliding-window rate limiting for Save Page Now submissions.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::info;

/// Sliding-window rate limiter over recent admission timestamps.
///
/// Tracks the instants of past admissions (oldest first) and suspends the
/// caller until a new request fits under `max_requests` per `window`. Every
/// network attempt, retries included, must pass through [`admit`] — a retry
/// consumes quota identically to a fresh request.
///
/// Admissions are strictly sequential (single caller), so when the window is
/// full at most one entry needs to expire before a slot opens; `admit` waits
/// for the oldest entry and evicts exactly that one.
///
/// [`admit`]: SlidingWindowLimiter::admit
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    timestamps: VecDeque<Instant>,
    max_requests: usize,
    window: Duration,
}

impl SlidingWindowLimiter {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: VecDeque::new(),
            max_requests,
            window,
        }
    }

    /// Wait until a new request is admissible, then record it.
    ///
    /// On return the caller is authorized to perform exactly one network
    /// attempt.
    pub async fn admit(&mut self) {
        let now = Instant::now();
        self.purge_expired(now);

        if self.timestamps.len() >= self.max_requests {
            if let Some(&oldest) = self.timestamps.front() {
                let wait = (oldest + self.window).saturating_duration_since(now);
                if wait > Duration::ZERO {
                    info!(
                        max_requests = self.max_requests,
                        wait_secs = wait.as_secs_f64(),
                        "Rate limit window full, waiting"
                    );
                    sleep(wait).await;
                }
                // The oldest entry has now aged out of the window.
                self.timestamps.pop_front();
            }
        }

        // Re-sample after any suspension.
        self.timestamps.push_back(Instant::now());
    }

    /// Drop all timestamps that have aged out of the window.
    fn purge_expired(&mut self, now: Instant) {
        if let Some(cutoff) = now.checked_sub(self.window) {
            while self.timestamps.front().is_some_and(|&t| t <= cutoff) {
                self.timestamps.pop_front();
            }
        }
    }

    /// Number of admissions currently inside the window.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.timestamps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn admits_up_to_quota_without_waiting() {
        let mut limiter = SlidingWindowLimiter::new(3, Duration::from_secs(60));
        let start = Instant::now();

        for _ in 0..3 {
            limiter.admit().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.in_flight(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn third_admission_waits_for_oldest_to_expire() {
        // max_requests=2, window=60s: the 3rd admission must be delayed until
        // the 1st timestamp is at least 60s old.
        let mut limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        limiter.admit().await;
        limiter.admit().await;
        limiter.admit().await;

        assert!(start.elapsed() >= Duration::from_secs(60));
        assert_eq!(limiter.in_flight(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_purged_without_waiting() {
        let mut limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));

        limiter.admit().await;
        limiter.admit().await;

        // Let the whole window elapse; both entries expire.
        tokio::time::advance(Duration::from_secs(61)).await;

        let before = Instant::now();
        limiter.admit().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
        assert_eq!(limiter.in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn no_window_ever_exceeds_quota() {
        let max_requests = 4;
        let window = Duration::from_secs(10);
        let mut limiter = SlidingWindowLimiter::new(max_requests, window);

        let mut admissions = Vec::new();
        for _ in 0..20 {
            limiter.admit().await;
            admissions.push(Instant::now());
        }

        // Check every trailing window ending at each admission instant.
        for (i, &end) in admissions.iter().enumerate() {
            let in_window = admissions[..=i]
                .iter()
                .filter(|&&t| end.saturating_duration_since(t) < window)
                .count();
            assert!(
                in_window <= max_requests,
                "admission {i}: {in_window} admissions within one window"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn staggered_admissions_wait_only_for_the_oldest() {
        let mut limiter = SlidingWindowLimiter::new(2, Duration::from_secs(60));

        limiter.admit().await;
        tokio::time::advance(Duration::from_secs(30)).await;
        limiter.admit().await;

        // Window is full; the oldest entry expires 30s from now.
        let before = Instant::now();
        limiter.admit().await;
        assert_eq!(before.elapsed(), Duration::from_secs(30));
    }
}

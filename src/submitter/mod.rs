//! The submission engine: drives every target URL through rate-limiter
//! admission, credential rotation, submission, outcome classification, and
//! bounded retry with backoff.

use anyhow::Result;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::directory;
use crate::wayback::{AttemptResult, WaybackClient};

pub mod backoff;
pub mod credentials;
pub mod rate_limiter;

use credentials::{CredentialError, CredentialRotator};
use rate_limiter::SlidingWindowLimiter;

/// Final outcome kept per target URL. Appended exactly once per URL, never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub url: String,
    pub outcome: AttemptResult,
}

/// Aggregate result of a run.
#[derive(Debug)]
pub struct RunSummary {
    records: Vec<SubmissionRecord>,
}

impl RunSummary {
    #[must_use]
    pub fn records(&self) -> &[SubmissionRecord] {
        &self.records
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    /// URLs whose final record carries an error (permanent failure or
    /// exhausted retries).
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.is_error()).count()
    }

    #[must_use]
    pub fn success_count(&self) -> usize {
        self.total() - self.error_count()
    }

    /// Errors whose final outcome was a rate limit.
    #[must_use]
    pub fn rate_limited_failures(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.outcome == AttemptResult::RateLimited)
            .count()
    }
}

/// Sequentially submits a list of URLs, sharing one rate-limiter window and
/// one credential pool across the whole run.
///
/// All mutable run state lives here: the limiter's timestamp window, the
/// rotation cursor, and the run-wide consecutive-failure counter.
pub struct SubmissionEngine {
    client: WaybackClient,
    limiter: SlidingWindowLimiter,
    rotator: CredentialRotator,
    max_retries_per_url: u32,
    base_retry_delay_secs: f64,
    /// Retryable failures since the last success, across all URLs. Feeds the
    /// backoff exponent so a run in sustained trouble slows down everywhere,
    /// not just on the failing URL.
    consecutive_failures: u32,
}

impl SubmissionEngine {
    /// Build an engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured credential list is empty.
    pub fn from_config(config: &Config) -> Result<Self, CredentialError> {
        Ok(Self {
            client: WaybackClient::new(config.save_endpoint.clone(), config.submit_timeout),
            limiter: SlidingWindowLimiter::new(config.max_requests_per_window, config.window),
            rotator: CredentialRotator::new(&config.tokens)?,
            max_retries_per_url: config.max_retries_per_url,
            base_retry_delay_secs: config.base_retry_delay_secs,
            consecutive_failures: 0,
        })
    }

    /// Process every URL in order, producing exactly one record per URL.
    ///
    /// Per-URL failures never abort the run; the only fatal error path is
    /// upstream of this call, in the directory fetch.
    pub async fn run(&mut self, websites: &[String]) -> RunSummary {
        let mut records = Vec::with_capacity(websites.len());

        for website in websites {
            let outcome = self.submit_with_retry(website).await;
            records.push(SubmissionRecord {
                url: website.clone(),
                outcome,
            });
        }

        let summary = RunSummary { records };
        info!(
            successful = summary.success_count(),
            total = summary.total(),
            "Completed submissions"
        );
        info!(
            errors = summary.error_count(),
            rate_limited_failures = summary.rate_limited_failures(),
            "Final error counts"
        );
        summary
    }

    /// Per-URL state machine: at most `max_retries_per_url` attempts, each
    /// one admitted through the rate limiter with a fresh credential.
    async fn submit_with_retry(&mut self, website: &str) -> AttemptResult {
        self.limiter.admit().await;
        let mut credential = self.rotator.next_credential();
        let mut attempt = 0;

        loop {
            let outcome = self.client.submit(website, &credential).await;

            if !outcome.is_error() {
                if self.consecutive_failures > 0 {
                    info!("Success, resetting consecutive failure count");
                }
                self.consecutive_failures = 0;
                return outcome;
            }

            if !outcome.is_retryable() {
                error!(url = %website, outcome = outcome.kind(), "Permanent error, not retrying");
                return outcome;
            }

            self.consecutive_failures += 1;
            let retry_delay = backoff::calculate_backoff_delay(
                self.base_retry_delay_secs,
                attempt + self.consecutive_failures / 2,
            );
            warn!(
                url = %website,
                outcome = outcome.kind(),
                attempt = attempt + 1,
                max_attempts = self.max_retries_per_url,
                retry_secs = retry_delay.as_secs_f64(),
                "Retryable error"
            );

            if attempt + 1 >= self.max_retries_per_url {
                error!(
                    url = %website,
                    attempts = self.max_retries_per_url,
                    "Failed to submit after all attempts"
                );
                return outcome;
            }

            sleep(retry_delay).await;
            // A retry consumes quota like any other request.
            self.limiter.admit().await;
            credential = self.rotator.next_credential();
            attempt += 1;
        }
    }
}

/// Run a full archival pass: resolve the target list from the organization
/// directory, then submit everything.
///
/// # Errors
///
/// Returns an error only if the directory fetch fails; per-URL submission
/// failures are captured in the returned summary instead.
pub async fn run_archival(config: &Config) -> Result<RunSummary> {
    info!("Getting org info");

    let http = reqwest::Client::builder()
        .timeout(config.submit_timeout)
        .build()
        .expect("Failed to create HTTP client");

    let organizations = directory::fetch_organizations(&http, &config.directory_api_host).await?;
    let websites = directory::resolve_targets(organizations, &config.additional_hosts);

    let mut engine = SubmissionEngine::from_config(config)?;
    Ok(engine.run(&websites).await)
}

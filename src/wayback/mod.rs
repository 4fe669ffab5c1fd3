//! Save Page Now client for the Internet Archive.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use tracing::debug;

use crate::submitter::credentials::Credential;

pub mod outcome;

pub use outcome::AttemptResult;

/// Save Page Now client.
///
/// Performs exactly one submission attempt per call; retry and rate-limiting
/// policy live with the caller.
pub struct WaybackClient {
    client: Client,
    save_endpoint: String,
}

impl WaybackClient {
    /// Create a new client for the given save endpoint.
    #[must_use]
    pub fn new(save_endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            save_endpoint: save_endpoint.into(),
        }
    }

    /// Submit a URL for archiving (one attempt) and classify the outcome.
    ///
    /// `capture_all=1` asks the service to also capture error pages rather
    /// than skipping them.
    pub async fn submit(&self, url: &str, credential: &Credential) -> AttemptResult {
        debug!(url = %url, "Submitting URL to Save Page Now");

        let result = self
            .client
            .post(&self.save_endpoint)
            .header(AUTHORIZATION, credential.authorization())
            .header(ACCEPT, "application/json")
            .form(&[("url", url), ("capture_all", "1")])
            .send()
            .await;

        match result {
            Ok(response) => outcome::classify_response(url, response).await,
            Err(e) => outcome::classify_transport_error(url, &e),
        }
    }
}

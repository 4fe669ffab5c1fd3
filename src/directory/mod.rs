//! Organization directory client.
//!
//! The directory is the source of target URLs: every organization that
//! exposes a `website` field gets submitted for archiving.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::constants::ORGANIZATIONS_PATH;

/// One directory entry. Only `website` matters here; the rest of the object
/// is tolerated and ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Fetch all directory entries from the organization API.
///
/// # Errors
///
/// Returns an error if the request fails or the response is not a 2xx JSON
/// array. This is the run's only fatal error: without the directory there is
/// nothing to archive.
pub async fn fetch_organizations(
    client: &reqwest::Client,
    api_host: &str,
) -> Result<Vec<Organization>> {
    let url = format!("{}{ORGANIZATIONS_PATH}", api_host.trim_end_matches('/'));

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to fetch organization directory")?;

    if !response.status().is_success() {
        anyhow::bail!(
            "Organization directory fetch failed with status {}",
            response.status()
        );
    }

    response
        .json::<Vec<Organization>>()
        .await
        .context("Failed to parse organization directory")
}

/// Resolve the full target list: organization websites first, in directory
/// order, then the configured extra hosts verbatim.
pub fn resolve_targets(organizations: Vec<Organization>, additional_hosts: &[String]) -> Vec<String> {
    let mut websites: Vec<String> = organizations
        .into_iter()
        .filter_map(|org| org.website)
        .collect();

    info!(count = websites.len(), "Found orgs with websites");

    websites.extend(additional_hosts.iter().cloned());

    info!(total = websites.len(), "Total websites to save");

    websites
}

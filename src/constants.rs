//! Shared constants used across the application.

/// Save Page Now submission endpoint.
pub const SAVE_PAGE_ENDPOINT: &str = "https://web.archive.org/save";

/// Path of the organization directory listing, relative to the API host.
pub const ORGANIZATIONS_PATH: &str = "/api/v1/organizations";

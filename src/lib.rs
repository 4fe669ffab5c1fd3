//! Organization website archiver library.
//!
//! A service that fetches an organization directory, and submits each
//! organization's website to the Internet Archive's Save Page Now API under a
//! client-side rate limit, rotating API tokens across requests.

pub mod config;
pub mod constants;
pub mod directory;
pub mod submitter;
pub mod wayback;

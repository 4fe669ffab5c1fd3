//! Classification of Save Page Now submission attempts.

use serde_json::Value;
use tracing::{error, info, warn};

/// The classified outcome of one submission attempt.
///
/// Every attempt produces exactly one of these; failures are data, never
/// propagated errors. `RateLimited`, `ServerError`, and `ConnectionError` are
/// transient and eligible for retry; the rest are permanent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptResult {
    /// 2xx response whose body parsed as JSON; carries the payload verbatim.
    Success(Value),
    /// HTTP 429 from the archive service.
    RateLimited,
    /// HTTP 5xx from the archive service.
    ServerError { status: u16 },
    /// Connect or timeout failure before a response was received.
    ConnectionError { detail: String },
    /// Any other HTTP 4xx (404 and friends).
    HttpError { status: u16 },
    /// 2xx response whose body was not valid JSON.
    ParseError { status: u16 },
    /// Any other transport failure.
    UnknownError { detail: String },
}

impl AttemptResult {
    /// Whether another attempt at the same URL may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::ServerError { .. } | Self::ConnectionError { .. }
        )
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        !matches!(self, Self::Success(_))
    }

    /// Short stable name for log lines and summaries.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Success(_) => "success",
            Self::RateLimited => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::ConnectionError { .. } => "connection_error",
            Self::HttpError { .. } => "http_error",
            Self::ParseError { .. } => "parse_error",
            Self::UnknownError { .. } => "unknown_error",
        }
    }
}

/// Classify a received HTTP response, consuming its body.
///
/// Infallible: every status and body shape maps to a variant. Emits one log
/// line per outcome, graded by severity.
pub async fn classify_response(url: &str, response: reqwest::Response) -> AttemptResult {
    let status = response.status();

    if status.as_u16() == 429 {
        warn!(url = %url, "Rate limited (429)");
        return AttemptResult::RateLimited;
    }
    if status.is_server_error() {
        error!(url = %url, status = %status, "Server error");
        return AttemptResult::ServerError {
            status: status.as_u16(),
        };
    }
    if status.is_client_error() {
        error!(url = %url, status = %status, "HTTP error");
        return AttemptResult::HttpError {
            status: status.as_u16(),
        };
    }

    // 2xx (or an unfollowed redirect): the payload is expected to be JSON.
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => return classify_transport_error(url, &e),
    };
    match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => {
            info!(url = %url, "Successfully submitted");
            AttemptResult::Success(payload)
        }
        Err(_) => {
            error!(url = %url, status = %status, "Response body was not valid JSON");
            AttemptResult::ParseError {
                status: status.as_u16(),
            }
        }
    }
}

/// Classify a transport-level failure (no response received).
pub fn classify_transport_error(url: &str, err: &reqwest::Error) -> AttemptResult {
    if err.is_connect() || err.is_timeout() {
        warn!(url = %url, error = %err, "Connection/timeout error");
        AttemptResult::ConnectionError {
            detail: err.to_string(),
        }
    } else {
        error!(url = %url, error = %err, "Failed to submit");
        AttemptResult::UnknownError {
            detail: err.to_string(),
        }
    }
}

//! Request failure taxonomy and its HTTP mapping.
//!
//! | failure                         | status |
//! |---------------------------------|--------|
//! | origin unreachable / timed out  | 502    |
//! | origin body not a JSON object   | 500    |
//! | client-facing encode failed     | 500    |
//! | cache-copy encode failed        | 500    |
//!
//! Every failure ends the current request; none touches the cache.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors that end a single proxied request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The cache key does not form a valid request target.
    #[error("invalid origin target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// Connection or transport failure talking to the origin.
    #[error("origin unreachable: {0}")]
    OriginUnreachable(String),

    /// The origin did not answer in time.
    #[error("origin timed out after {0} seconds")]
    OriginTimeout(u64),

    /// The origin body could not be read in full.
    #[error("failed to read origin body: {0}")]
    BodyRead(String),

    /// The origin body is not a single JSON object.
    #[error("origin body is not a JSON object: {0}")]
    Decode(#[source] serde_json::Error),

    /// Encoding the decoded object for the client failed.
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// Encoding the decoded object for the cache failed.
    #[error("failed to encode response for cache: {0}")]
    CacheEncode(#[source] serde_json::Error),
}

impl ProxyError {
    /// HTTP status reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidTarget { .. }
            | ProxyError::OriginUnreachable(_)
            | ProxyError::OriginTimeout(_) => StatusCode::BAD_GATEWAY,
            ProxyError::BodyRead(_)
            | ProxyError::Decode(_)
            | ProxyError::Encode(_)
            | ProxyError::CacheEncode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short client-facing message. Internal detail stays in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::InvalidTarget { .. }
            | ProxyError::OriginUnreachable(_)
            | ProxyError::OriginTimeout(_) => "Error fetching from origin",
            ProxyError::BodyRead(_) | ProxyError::Decode(_) => {
                "Error decoding response from origin"
            }
            ProxyError::Encode(_) => "Error encoding response",
            ProxyError::CacheEncode(_) => "Error encoding response for cache",
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), format!("{}\n", self.public_message())).into_response()
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require an origin and check it is a usable HTTP base address
//! - Validate value ranges (timeouts > 0, port valid)
//! - Keep the request timeout above the worst-case origin round trip, so a
//!   slow origin surfaces as a gateway failure rather than a request timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - The origin string itself is never rewritten; it becomes the key prefix verbatim

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("origin not specified")]
    MissingOrigin,

    #[error("origin '{0}' is not a valid URL")]
    InvalidOrigin(String),

    #[error("origin scheme '{0}' is not supported (expected http or https)")]
    UnsupportedScheme(String),

    #[error("origin '{0}' must not carry a query or fragment")]
    OriginHasQuery(String),

    #[error("listener port must be non-zero")]
    ZeroPort,

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error(
        "timeouts.request_secs ({request_secs}) must be at least connect_secs + origin_secs ({required})"
    )]
    RequestTimeoutTooShort { request_secs: u64, required: u64 },

    #[error("origin.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Check `config` for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let origin = config.origin.url.as_str();
    if origin.trim().is_empty() {
        errors.push(ValidationError::MissingOrigin);
    } else if origin.trim() != origin {
        errors.push(ValidationError::InvalidOrigin(origin.to_string()));
    } else {
        match Url::parse(origin) {
            Ok(url) => {
                if !matches!(url.scheme(), "http" | "https") {
                    errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
                }
                if url.query().is_some() || url.fragment().is_some() {
                    errors.push(ValidationError::OriginHasQuery(origin.to_string()));
                }
            }
            Err(_) => errors.push(ValidationError::InvalidOrigin(origin.to_string())),
        }
    }

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    let timeouts = [
        ("connect_secs", config.timeouts.connect_secs),
        ("origin_secs", config.timeouts.origin_secs),
        ("request_secs", config.timeouts.request_secs),
    ];
    for (name, value) in timeouts {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(name));
        }
    }

    let required = config
        .timeouts
        .connect_secs
        .saturating_add(config.timeouts.origin_secs);
    if config.timeouts.request_secs < required {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_secs: config.timeouts.request_secs,
            required,
        });
    }

    if config.origin.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

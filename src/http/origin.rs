//! Origin client.
//!
//! # Responsibilities
//! - Turn a cache key into a `GET` against the origin (http or https)
//! - Follow origin redirects; the cache key stays the requested address
//! - Enforce connect and response timeouts
//! - Buffer the origin body up to the configured limit
//! - Decode the body strictly as one JSON object
//!
//! # Design Decisions
//! - One pooled reqwest client shared by every request
//! - Environment proxy settings are ignored; the origin is contacted directly
//! - The fetch holds no cache lock; only the later insert does
//! - Every fetch failure maps to the same error class: no retry, no
//!   transient/permanent distinction

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use reqwest::{redirect, Client, Url};
use serde_json::{Map, Value};

use crate::cache::CacheKey;
use crate::config::ProxyConfig;
use crate::http::error::ProxyError;
use crate::observability::metrics;

/// Redirect hops followed before the fetch is treated as failed.
const MAX_REDIRECTS: usize = 10;

/// A JSON object as decoded from the origin.
pub type JsonObject = Map<String, Value>;

/// A fully buffered origin response.
#[derive(Debug)]
pub struct OriginResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OriginResponse {
    /// Decode the body as a single JSON object.
    pub fn json_object(&self) -> Result<JsonObject, ProxyError> {
        decode_object(&self.body)
    }
}

/// Client for the single configured origin.
#[derive(Debug, Clone)]
pub struct OriginClient {
    base: String,
    client: Client,
    response_timeout: Duration,
    max_body_bytes: usize,
}

impl OriginClient {
    /// Build a client from configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .no_proxy()
            .build()?;

        Ok(Self {
            base: config.origin.url.clone(),
            client,
            response_timeout: Duration::from_secs(config.timeouts.origin_secs),
            max_body_bytes: config.origin.max_body_bytes,
        })
    }

    /// The configured origin base address, verbatim.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Cache key (and fetch target) for an inbound request path.
    pub fn key_for(&self, path: &str) -> CacheKey {
        CacheKey::new(&self.base, path)
    }

    /// Fetch `key` from the origin and buffer the whole body.
    pub async fn fetch(&self, key: &CacheKey) -> Result<OriginResponse, ProxyError> {
        let start = Instant::now();
        let result = self.fetch_inner(key).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(ProxyError::OriginTimeout(_)) => "timeout",
            Err(ProxyError::BodyRead(_)) => "body_error",
            Err(_) => "error",
        };
        metrics::record_origin_fetch(outcome, start);

        result
    }

    async fn fetch_inner(&self, key: &CacheKey) -> Result<OriginResponse, ProxyError> {
        let url = Url::parse(key.as_str()).map_err(|e| ProxyError::InvalidTarget {
            target: key.to_string(),
            reason: e.to_string(),
        })?;

        let mut response = tokio::time::timeout(self.response_timeout, self.client.get(url).send())
            .await
            .map_err(|_| ProxyError::OriginTimeout(self.response_timeout.as_secs()))?
            .map_err(|e| ProxyError::OriginUnreachable(e.to_string()))?;

        if let Some(len) = response.content_length() {
            if len > self.max_body_bytes as u64 {
                return Err(ProxyError::BodyRead(format!(
                    "length {} exceeds limit of {} bytes",
                    len, self.max_body_bytes
                )));
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ProxyError::BodyRead(e.to_string()))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(ProxyError::BodyRead(format!(
                    "body exceeds limit of {} bytes",
                    self.max_body_bytes
                )));
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(
            target_url = %key,
            final_url = %response.url(),
            status = %response.status(),
            body_len = body.len(),
            "Origin responded"
        );

        Ok(OriginResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: Bytes::from(body),
        })
    }
}

/// Decode `body` strictly as one JSON object.
///
/// Malformed JSON, trailing data and non-object values (arrays, scalars,
/// `null`) are all decode failures.
pub fn decode_object(body: &[u8]) -> Result<JsonObject, ProxyError> {
    serde_json::from_slice::<JsonObject>(body).map_err(ProxyError::Decode)
}

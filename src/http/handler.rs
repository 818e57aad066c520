//! The caching proxy handler.
//!
//! Per request:
//! ```text
//! received → key derived → cache checked
//!     ├── hit  → stored headers + X-Cache: HIT + stored body
//!     └── miss → origin fetch ──✗──→ 502
//!                  → decode JSON object ──✗──→ 500
//!                  → encode for client, encode for cache ──✗──→ 500
//!                  → insert entry → X-Cache: MISS + live body
//! ```
//!
//! Lookup and insert are separate critical sections. Two concurrent misses
//! for the same cold key both fetch the origin and the last insert wins,
//! unless single-flight is enabled.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Uri},
    response::{IntoResponse, Response},
};

use crate::cache::{entry::snapshot_headers, CacheEntry, CacheKey};
use crate::http::error::ProxyError;
use crate::http::request::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;

/// Cache status marker header.
pub const X_CACHE: HeaderName = HeaderName::from_static("x-cache");
pub const CACHE_HIT: &str = "HIT";
pub const CACHE_MISS: &str = "MISS";

/// Main proxy handler, mounted for every path and method.
pub async fn proxy_handler(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let key = state.origin.key_for(uri.path());

    match resolve(&state, key).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                path = %uri.path(),
                status = %e.status(),
                error = %e,
                "Request failed"
            );
            e.into_response()
        }
    }
}

/// Serve `key` from the cache, or fetch it from the origin and cache it.
pub async fn resolve(state: &AppState, key: CacheKey) -> Result<Response, ProxyError> {
    if let Some(entry) = state.cache.lookup(&key) {
        metrics::record_lookup(true);
        tracing::debug!(key = %key, "Cache hit");
        return Ok(hit_response(&entry));
    }

    let _flight = match &state.flights {
        Some(flights) => {
            let guard = flights.enter(&key).await;
            // The request that held the slot may have filled the cache.
            if let Some(entry) = state.cache.lookup(&key) {
                metrics::record_lookup(true);
                tracing::debug!(key = %key, "Cache filled while waiting on in-flight fetch");
                return Ok(hit_response(&entry));
            }
            Some(guard)
        }
        None => None,
    };
    metrics::record_lookup(false);

    tracing::debug!(key = %key, "Cache miss, fetching from origin");
    let origin = state.origin.fetch(&key).await?;
    let object = origin.json_object()?;

    let mut live = serde_json::to_vec(&object).map_err(ProxyError::Encode)?;
    live.push(b'\n');

    let stored = serde_json::to_vec(&object).map_err(ProxyError::CacheEncode)?;
    let entry = CacheEntry::new(stored, snapshot_headers(&origin.headers));
    state.cache.insert(key, entry);
    metrics::record_cache_size(state.cache.len());

    Ok(miss_response(live))
}

/// Build the response for a cached entry.
fn hit_response(entry: &CacheEntry) -> Response {
    let mut response = Body::from(entry.body().clone()).into_response();
    let headers = response.headers_mut();
    // Stored values replace any same-named header already on the response.
    headers.extend(entry.headers().clone());
    headers.insert(X_CACHE, HeaderValue::from_static(CACHE_HIT));
    response
}

/// Build the response for a freshly fetched object.
fn miss_response(body: Vec<u8>) -> Response {
    let mut response = Body::from(body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(X_CACHE, HeaderValue::from_static(CACHE_MISS));
    response
}

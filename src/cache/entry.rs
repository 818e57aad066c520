//! Cached response entries.

use std::time::SystemTime;

use axum::body::Bytes;
use axum::http::HeaderMap;

/// Headers describing the origin connection rather than the resource.
/// They are never stored: the cached body is re-encoded, so the origin's
/// framing does not describe it.
const CONNECTION_HEADERS: [&str; 8] = [
    "connection",
    "content-length",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// One cached origin response.
///
/// The entry owns its body and its header snapshot outright; nothing in it
/// aliases request-scoped buffers.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    body: Bytes,
    headers: HeaderMap,
    created_at: SystemTime,
}

impl CacheEntry {
    /// Create an entry stamped with the current time.
    pub fn new(body: impl Into<Bytes>, headers: HeaderMap) -> Self {
        Self {
            body: body.into(),
            headers,
            created_at: SystemTime::now(),
        }
    }

    /// The re-encoded JSON body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The header snapshot taken at insert time.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// When the entry was created. Recorded only; entries never expire.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }
}

/// Take an independent copy of `headers`, dropping connection-level headers.
pub fn snapshot_headers(headers: &HeaderMap) -> HeaderMap {
    let mut snapshot = headers.clone();
    for name in CONNECTION_HEADERS {
        snapshot.remove(name);
    }
    snapshot
}

//! Single-origin caching reverse proxy.
//!
//! Forwards unseen paths to one origin, decodes the JSON object it returns,
//! and memoizes the re-encoded result by path so later requests for the same
//! path never reach the origin.

pub mod cache;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use cache::{CacheEntry, CacheKey, CacheStore};
pub use config::ProxyConfig;
pub use http::HttpServer;

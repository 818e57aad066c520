//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, graceful shutdown)
//!     → request.rs (request ID generated and propagated)
//!     → handler.rs (cache key → lookup → hit | miss)
//!         miss → origin.rs (GET origin+path, buffer, decode JSON object)
//!     → error.rs (failures mapped to 502 / 500)
//!     → Send to client
//! ```

pub mod error;
pub mod handler;
pub mod origin;
pub mod request;
pub mod server;

pub use error::ProxyError;
pub use handler::{CACHE_HIT, CACHE_MISS, X_CACHE};
pub use origin::{OriginClient, OriginResponse};
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};

//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize, apply CLI overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared with the HTTP server at construction
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the origin never changes at runtime
//! - All fields except the origin URL have defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, Overrides};
pub use schema::{
    CacheConfig, ListenerConfig, ObservabilityConfig, OriginConfig, ProxyConfig, StoreKind,
    TimeoutConfig,
};

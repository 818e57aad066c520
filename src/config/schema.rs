//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the caching proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// The single upstream origin.
    pub origin: OriginConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Cache store settings.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 6000,
        }
    }
}

/// Origin server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Base address every request path is appended to (e.g., "http://localhost:3000").
    /// Required; the process refuses to start without it.
    pub url: String,

    /// Largest origin body that will be buffered and decoded.
    pub max_body_bytes: usize,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_body_bytes: 8 * 1024 * 1024, // 8MB
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Origin connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the origin to answer with response headers, in seconds.
    pub origin_secs: u64,

    /// Total time for one inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            origin_secs: 30,
            request_secs: 60,
        }
    }
}

/// Which cache store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// One shared/exclusive lock over the whole map.
    #[default]
    Locked,
    /// Sharded concurrent map; writers to different keys do not contend.
    Sharded,
}

/// Cache configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Store implementation.
    pub store: StoreKind,

    /// Collapse concurrent misses for the same key into one origin fetch.
    pub single_flight: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [origin]
            url = "http://localhost:3000"
            "#,
        )
        .unwrap();

        assert_eq!(config.origin.url, "http://localhost:3000");
        assert_eq!(config.listener.port, 6000);
        assert_eq!(config.listener.bind_address(), "0.0.0.0:6000");
        assert_eq!(config.cache.store, StoreKind::Locked);
        assert!(!config.cache.single_flight);
    }

    #[test]
    fn test_full_config() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [listener]
            host = "127.0.0.1"
            port = 7000

            [origin]
            url = "http://api.internal:8080"
            max_body_bytes = 1024

            [timeouts]
            connect_secs = 1
            origin_secs = 2
            request_secs = 3

            [cache]
            store = "sharded"
            single_flight = true

            [observability]
            log_level = "debug"
            metrics_enabled = true
            metrics_address = "127.0.0.1:9191"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address(), "127.0.0.1:7000");
        assert_eq!(config.origin.max_body_bytes, 1024);
        assert_eq!(config.timeouts.origin_secs, 2);
        assert_eq!(config.cache.store, StoreKind::Sharded);
        assert!(config.cache.single_flight);
        assert_eq!(config.observability.log_level, "debug");
    }
}

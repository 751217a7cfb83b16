//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream events API
    pub api_base_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of queries the cache can hold
    pub max_entries: usize,
    /// Seconds a fetched value counts as fresh
    pub stale_time: u64,
    /// Seconds an untouched query stays cached before garbage collection
    pub gc_time: u64,
    /// Background garbage collection interval in seconds
    pub gc_interval: u64,
    /// Upstream request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Upstream events API (default: http://localhost:3000)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `MAX_ENTRIES` - Maximum cached queries (default: 1000)
    /// - `STALE_TIME` - Freshness window in seconds (default: 0)
    /// - `GC_TIME` - Idle time before eviction in seconds (default: 300)
    /// - `GC_INTERVAL` - Garbage collection frequency in seconds (default: 30)
    /// - `REQUEST_TIMEOUT_MS` - Upstream request timeout (default: 10000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.api_base_url),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            stale_time: parse_var("STALE_TIME").unwrap_or(defaults.stale_time),
            gc_time: parse_var("GC_TIME").unwrap_or(defaults.gc_time),
            gc_interval: parse_var("GC_INTERVAL").unwrap_or(defaults.gc_interval),
            request_timeout_ms: parse_var("REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            server_port: 8080,
            max_entries: 1000,
            stale_time: 0,
            gc_time: 300,
            gc_interval: 30,
            request_timeout_ms: 10_000,
        }
    }
}

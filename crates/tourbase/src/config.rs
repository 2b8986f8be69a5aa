use std::{env, time::Duration};

use crate::reader::RetryPolicy;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache TTL in seconds (default: 300)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Per-attempt remote operation timeout in seconds (default: 10)
    pub op_timeout_seconds: u64,
    /// Maximum attempts per remote operation (default: 3)
    pub retry_max_attempts: u32,
    /// Base delay for exponential backoff in milliseconds (default: 100)
    pub retry_base_delay_ms: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Cache TTL in seconds (default: 300)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `OP_TIMEOUT_SECONDS` - Remote operation timeout (default: 10)
    /// - `RETRY_MAX_ATTEMPTS` - Attempts per remote operation (default: 3)
    /// - `RETRY_BASE_DELAY_MS` - Backoff base delay (default: 100)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: parse_env("CACHE_TTL_SECONDS", 300),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", 10_000),
            op_timeout_seconds: parse_env("OP_TIMEOUT_SECONDS", 10),
            retry_max_attempts: parse_env("RETRY_MAX_ATTEMPTS", 3),
            retry_base_delay_ms: parse_env("RETRY_BASE_DELAY_MS", 100),
        }
    }

    /// Get cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    /// Get the per-attempt operation timeout as a Duration.
    pub fn op_timeout(&self) -> Duration {
        Duration::from_secs(self.op_timeout_seconds)
    }

    /// Get the retry policy for remote reads and writes.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry_max_attempts.max(1),
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

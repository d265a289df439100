//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// TTL for cached principals in seconds. Kept short: the cache bounds
    /// the staleness window for identity reads after deactivation.
    pub user_ttl_secs: u64,

    /// Per-operation deadline in milliseconds
    pub op_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            user_ttl_secs: 60,
            op_timeout_ms: 2_000,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let user_ttl_secs = std::env::var("CACHE_USER_TTL_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);
        let op_timeout_ms = std::env::var("CACHE_OP_TIMEOUT_MS")
            .unwrap_or_else(|_| "2000".to_string())
            .parse()
            .unwrap_or(2_000);

        Self {
            url,
            user_ttl_secs,
            op_timeout_ms,
        }
    }
}

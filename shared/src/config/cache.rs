//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Backend holding issued OTP records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// Process-local map
    #[default]
    Memory,
    /// Redis
    Redis,
}

/// OTP record cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Backend selection
    pub backend: CacheType,

    /// Redis connection URL
    pub url: String,

    /// Key prefix for every stored record
    pub key_prefix: String,

    /// Connection attempts before giving up
    pub max_retries: u32,

    /// Base delay between connection attempts in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheType::Memory,
            url: String::from("redis://localhost:6379"),
            key_prefix: String::from("otp"),
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

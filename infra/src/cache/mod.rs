//! Cache module for OTP record storage
//!
//! This module provides the stores behind the OTP service: a process-local
//! map for development and single-instance deployments, and Redis for
//! deployments running several API instances.

pub mod memory_store;
#[cfg(feature = "redis-cache")]
pub mod redis_client;
#[cfg(feature = "redis-cache")]
pub mod redis_store;


use std::sync::Arc;

use mw_core::services::OtpStoreTrait;
use mw_shared::config::{CacheConfig, CacheType};

use crate::InfrastructureError;

pub use memory_store::InMemoryOtpStore;
#[cfg(feature = "redis-cache")]
pub use redis_client::RedisClient;
#[cfg(feature = "redis-cache")]
pub use redis_store::RedisOtpStore;

/// Create the OTP store selected by configuration
///
/// # Arguments
///
/// * `config` - Cache configuration naming the backend
///
/// # Returns
///
/// A shared store, or an error when the backend cannot be reached or was
/// not compiled in
pub async fn create_otp_store(
    config: &CacheConfig,
) -> Result<Arc<dyn OtpStoreTrait>, InfrastructureError> {
    match config.backend {
        CacheType::Memory => {
            tracing::info!(backend = "memory", "Using in-memory OTP store");
            Ok(Arc::new(InMemoryOtpStore::new()))
        }
        #[cfg(feature = "redis-cache")]
        CacheType::Redis => {
            let client = RedisClient::new(config.clone()).await?;
            tracing::info!(backend = "redis", "Using Redis OTP store");
            Ok(Arc::new(RedisOtpStore::new(client, config.key_prefix.clone())))
        }
        #[cfg(not(feature = "redis-cache"))]
        CacheType::Redis => Err(InfrastructureError::Config(
            "Redis OTP store requested but the redis-cache feature is disabled".to_string(),
        )),
    }
}

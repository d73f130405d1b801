//! Redis cache client implementation
//!
//! This module provides a Redis client with retry logic and the handful of
//! key operations the OTP store needs: set with expiry, get, delete, Lua
//! scripts and a health check.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult, Script};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use mw_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound of the exponential backoff between retries
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with retry logic
///
/// Cloning is cheap; clones share the multiplexed connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Maximum number of attempts per operation
    max_retries: u32,
    /// Base delay between retries (exponential backoff)
    retry_delay_ms: u64,
}

impl RedisClient {
    /// Connect using the retry settings of `config`
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "Creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!(error = %e, "Failed to parse Redis URL");
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let max_retries = config.max_retries.max(1);
        let connection =
            Self::create_connection_with_retry(client, max_retries, config.retry_delay_ms).await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            max_retries,
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Create multiplexed connection with retry logic
    async fn create_connection_with_retry(
        client: Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "Attempting to connect to Redis");

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!(
                        "Failed to connect to Redis after {} attempts: {}",
                        attempts, e
                    );
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// Set a value that expires after `expiry_seconds`
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!("Setting key '{}' with expiry {}s", key, expiry_seconds);

        let key_owned = key.to_string();
        let value = value.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key_owned.clone();
            let value = value.clone();
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to set key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Get a value, `None` when absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        debug!("Getting key '{}'", key);

        let key_owned = key.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key_owned.clone();
            Box::pin(async move { conn.get::<_, Option<String>>(key).await })
        })
        .await
        .map_err(|e| {
            error!("Failed to get key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        debug!("Deleting key '{}'", key);

        let key_owned = key.to_string();
        self.execute_with_retry(move |mut conn| {
            let key = key_owned.clone();
            Box::pin(async move { conn.del::<_, u32>(key).await })
        })
        .await
        .map(|deleted| deleted > 0)
        .map_err(|e| {
            error!("Failed to delete key '{}': {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Run a Lua script against a single key, returning its integer reply
    pub async fn eval_script(
        &self,
        script: &Script,
        key: &str,
        args: &[String],
    ) -> Result<i64, InfrastructureError> {
        debug!("Running script on key '{}'", key);

        let key_owned = key.to_string();
        let script = script.clone();
        let args = args.to_vec();
        self.execute_with_retry(move |mut conn| {
            let script = script.clone();
            let key = key_owned.clone();
            let args = args.clone();
            Box::pin(async move {
                let mut invocation = script.key(key);
                for arg in &args {
                    invocation.arg(arg);
                }
                invocation.invoke_async::<_, i64>(&mut conn).await
            })
        })
        .await
        .map_err(|e| {
            error!("Script on key '{}' failed: {}", key, e);
            InfrastructureError::Cache(e)
        })
    }

    /// Check connectivity with a PING
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry(|mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await
            .map_err(|e| {
                error!("Redis health check failed: {}", e);
                InfrastructureError::Cache(e)
            })?;

        if response != "PONG" {
            warn!("Redis health check returned unexpected response: {}", response);
            return Ok(false);
        }
        Ok(true)
    }

    /// Run `operation`, retrying transient failures with exponential backoff
    async fn execute_with_retry<F, T>(&self, operation: F) -> RedisResult<T>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.retry_delay_ms;

        loop {
            attempts += 1;
            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < self.max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis operation failed (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, self.max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn next_delay(delay: u64) -> u64 {
    (delay * 2).min(MAX_RETRY_DELAY_MS)
}

/// Connection-level failures are worth another attempt, command errors are not
fn is_retriable_error(error: &RedisError) -> bool {
    error.is_io_error() || error.is_connection_dropped() || error.is_timeout()
}

/// Hide credentials in a Redis URL for logging
pub fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

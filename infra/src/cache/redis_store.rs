//! OTP storage in Redis
//!
//! Each address and purpose owns a single key holding the JSON-encoded
//! record. The key's TTL tracks the code's expiry so Redis drops stale
//! codes on its own.

use async_trait::async_trait;
use chrono::Utc;
use once_cell::sync::Lazy;
use redis::Script;
use tracing::{debug, warn};

use mw_core::domain::OtpCode;
use mw_core::services::OtpStoreTrait;
use mw_shared::{mask_email, OtpPurpose};

use crate::cache::RedisClient;

/// Overwrites the record only while its id, attempts and used flag are
/// still the ones the caller read.
///
/// KEYS[1] record key; ARGV: id, attempts, is_used, new payload, ttl
static COMPARE_AND_SET: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local raw = redis.call('GET', KEYS[1])
if not raw then
    return 0
end
local stored = cjson.decode(raw)
if stored.id ~= ARGV[1]
    or stored.attempts ~= tonumber(ARGV[2])
    or tostring(stored.is_used) ~= ARGV[3] then
    return 0
end
redis.call('SET', KEYS[1], ARGV[4], 'EX', ARGV[5])
return 1
"#,
    )
});

/// Redis-backed OTP store
#[derive(Clone)]
pub struct RedisOtpStore {
    client: RedisClient,
    prefix: String,
}

impl RedisOtpStore {
    pub fn new(client: RedisClient, prefix: impl Into<String>) -> Self {
        Self {
            client,
            prefix: prefix.into(),
        }
    }

    /// Key holding the current code for an address and purpose
    pub fn key_for(&self, email: &str, purpose: OtpPurpose) -> String {
        record_key(&self.prefix, email, purpose)
    }

    async fn write(&self, code: &OtpCode) -> Result<(), String> {
        let ttl = ttl_seconds(code);
        let payload = serde_json::to_string(code).map_err(|e| e.to_string())?;
        self.client
            .set_with_expiry(&self.key_for(&code.email, code.purpose), &payload, ttl)
            .await
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl OtpStoreTrait for RedisOtpStore {
    async fn replace(&self, code: &OtpCode) -> Result<(), String> {
        self.write(code).await?;
        debug!(
            email = %mask_email(&code.email),
            purpose = %code.purpose,
            event = "otp_cached",
            "Stored OTP in Redis"
        );
        Ok(())
    }

    async fn latest(&self, email: &str, purpose: OtpPurpose) -> Result<Option<OtpCode>, String> {
        let Some(payload) = self
            .client
            .get(&self.key_for(email, purpose))
            .await
            .map_err(|e| e.to_string())?
        else {
            return Ok(None);
        };

        match serde_json::from_str::<OtpCode>(&payload) {
            Ok(code) => Ok(Some(code)),
            Err(e) => {
                // Unreadable records are treated as missing
                warn!(
                    email = %mask_email(email),
                    error = %e,
                    event = "otp_cache_corrupt",
                    "Discarding unreadable OTP record"
                );
                if let Err(e) = self.client.delete(&self.key_for(email, purpose)).await {
                    warn!(
                        email = %mask_email(email),
                        error = %e,
                        event = "otp_cache_cleanup_failed",
                        "Failed to delete unreadable OTP record"
                    );
                }
                Ok(None)
            }
        }
    }

    async fn compare_and_save(&self, current: &OtpCode, updated: &OtpCode) -> Result<bool, String> {
        let payload = serde_json::to_string(updated).map_err(|e| e.to_string())?;
        let args = compare_and_set_args(current, payload, ttl_seconds(updated));
        let stored = self
            .client
            .eval_script(&COMPARE_AND_SET, &self.key_for(&current.email, current.purpose), &args)
            .await
            .map_err(|e| e.to_string())?;
        Ok(stored == 1)
    }

    async fn purge_expired(&self) -> Result<usize, String> {
        // Key TTLs already evict expired codes
        Ok(0)
    }
}

pub(crate) fn record_key(prefix: &str, email: &str, purpose: OtpPurpose) -> String {
    format!("{}:{}:{}", prefix, purpose.as_str(), email)
}

pub(crate) fn compare_and_set_args(current: &OtpCode, payload: String, ttl: u64) -> Vec<String> {
    vec![
        current.id.to_string(),
        current.attempts.to_string(),
        current.is_used.to_string(),
        payload,
        ttl.to_string(),
    ]
}

/// Seconds until the code expires, never less than one
pub(crate) fn ttl_seconds(code: &OtpCode) -> u64 {
    (code.expires_at - Utc::now()).num_seconds().max(1) as u64
}

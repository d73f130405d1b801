//! In-memory OTP store

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use mw_core::domain::OtpCode;
use mw_core::services::OtpStoreTrait;
use mw_shared::OtpPurpose;

/// Process-local OTP store holding one code per email and purpose
#[derive(Debug, Default)]
pub struct InMemoryOtpStore {
    codes: RwLock<HashMap<(String, OtpPurpose), OtpCode>>,
}

impl InMemoryOtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored codes, expired ones included
    pub async fn len(&self) -> usize {
        self.codes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.codes.read().await.is_empty()
    }
}

#[async_trait]
impl OtpStoreTrait for InMemoryOtpStore {
    async fn replace(&self, code: &OtpCode) -> Result<(), String> {
        self.codes
            .write()
            .await
            .insert((code.email.clone(), code.purpose), code.clone());
        Ok(())
    }

    async fn latest(&self, email: &str, purpose: OtpPurpose) -> Result<Option<OtpCode>, String> {
        Ok(self
            .codes
            .read()
            .await
            .get(&(email.to_string(), purpose))
            .cloned())
    }

    async fn compare_and_save(&self, current: &OtpCode, updated: &OtpCode) -> Result<bool, String> {
        let mut codes = self.codes.write().await;
        match codes.get_mut(&(current.email.clone(), current.purpose)) {
            Some(stored) if stored == current => {
                *stored = updated.clone();
                Ok(true)
            }
            // Changed or replaced since it was read
            _ => Ok(false),
        }
    }

    async fn purge_expired(&self) -> Result<usize, String> {
        let now = Utc::now();
        let mut codes = self.codes.write().await;
        let before = codes.len();
        codes.retain(|_, code| code.expires_at > now);
        Ok(before - codes.len())
    }
}

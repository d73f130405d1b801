//! Traits for mail delivery and OTP record storage

use async_trait::async_trait;
use mw_shared::OtpPurpose;

use crate::domain::entities::OtpCode;

/// Trait for outbound mail integration
#[async_trait]
pub trait MailerTrait: Send + Sync {
    /// Deliver `code` to `email`
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<(), String>;
}

/// Trait for OTP record storage
#[async_trait]
pub trait OtpStoreTrait: Send + Sync {
    /// Store `code`, removing every other code for the same email and purpose
    async fn replace(&self, code: &OtpCode) -> Result<(), String>;
    /// Most recently issued code for the email and purpose, used or not
    async fn latest(&self, email: &str, purpose: OtpPurpose) -> Result<Option<OtpCode>, String>;
    /// Store `updated` only if the stored code still equals `current`
    ///
    /// The check and the write form one atomic step. Returns `false` when
    /// another writer changed or replaced the code since it was read.
    async fn compare_and_save(&self, current: &OtpCode, updated: &OtpCode)
        -> Result<bool, String>;
    /// Remove expired codes, returning how many were removed
    async fn purge_expired(&self) -> Result<usize, String>;
}

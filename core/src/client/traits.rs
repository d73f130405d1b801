//! Traits for the collaborators of a verification session

use async_trait::async_trait;
use mw_shared::OtpPurpose;

use crate::errors::GatewayError;

use super::types::{NoticeKind, Redirect, ResendReply, VerifyReply};

/// Trait for the external OTP verification service
#[async_trait]
pub trait VerificationGateway: Send + Sync {
    /// Check `code` for `identity`
    async fn verify(
        &self,
        identity: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<VerifyReply, GatewayError>;
    /// Ask for a fresh code to be issued to `identity`
    async fn resend(&self, identity: &str, purpose: OtpPurpose) -> Result<ResendReply, GatewayError>;
}

/// Trait for the durable key-value slot that survives reloads
#[async_trait]
pub trait PendingIdentityStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, String>;
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<(), String>;
    /// Remove the value stored under `key`
    async fn clear(&self, key: &str) -> Result<(), String>;
}

/// Trait for the navigation layer receiving redirects
pub trait NavigationSink: Send + Sync {
    fn navigate(&self, redirect: Redirect);
}

/// Trait for the toast display
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, kind: NoticeKind);
}

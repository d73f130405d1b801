//! Main OTP service implementation

use std::sync::Arc;

use mw_shared::{is_valid_email, mask_email, normalize_email, OtpConfig, OtpPurpose};

use crate::domain::entities::OtpCode;
use crate::errors::{OtpError, OtpResult};

use super::traits::{MailerTrait, OtpStoreTrait};
use super::types::SendCodeResult;

/// Service issuing and checking one-time passcodes sent by email
pub struct OtpService {
    /// Mail delivery
    mailer: Arc<dyn MailerTrait>,
    /// Code storage
    store: Arc<dyn OtpStoreTrait>,
    /// Code policy
    config: OtpConfig,
}

impl OtpService {
    /// Create a new OTP service
    ///
    /// # Arguments
    ///
    /// * `mailer` - Mail delivery implementation
    /// * `store` - OTP record storage implementation
    /// * `config` - Code length, lifetime, cooldown and attempt policy
    pub fn new(
        mailer: Arc<dyn MailerTrait>,
        store: Arc<dyn OtpStoreTrait>,
        config: OtpConfig,
    ) -> Self {
        Self {
            mailer,
            store,
            config,
        }
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Issue a code to an email address
    ///
    /// This method:
    /// 1. Validates the email format
    /// 2. Replaces every previous code for the address and purpose
    /// 3. Sends the new code by email
    ///
    /// A delivery failure does not fail the request; the result reports it
    /// and the code is written to the log instead.
    pub async fn send_code(&self, email: &str, purpose: OtpPurpose) -> OtpResult<SendCodeResult> {
        let email = Self::checked_email(email)?;
        self.issue(email, purpose, false).await
    }

    /// Issue a fresh code unless one was issued within the resend cooldown
    pub async fn resend_code(&self, email: &str, purpose: OtpPurpose) -> OtpResult<SendCodeResult> {
        let email = Self::checked_email(email)?;
        let cooldown = self.config.resend_cooldown_seconds as i64;

        if let Some(latest) = self
            .store
            .latest(&email, purpose)
            .await
            .map_err(|e| Self::storage_error("otp_lookup_failed", &email, e))?
        {
            if latest.created_within(cooldown) {
                let retry_after_seconds = latest.seconds_until(cooldown).max(1);
                tracing::warn!(
                    email = %mask_email(&email),
                    purpose = %purpose,
                    retry_after_seconds = retry_after_seconds,
                    event = "otp_resend_too_soon",
                    "OTP resend requested within cooldown"
                );
                return Err(OtpError::ResendTooSoon {
                    wait: self.config.cooldown_label(),
                    retry_after_seconds,
                });
            }
        }

        self.issue(email, purpose, true).await
    }

    /// Check a code submitted for an email address
    ///
    /// Only the most recent unused code is considered. Every failed check
    /// counts against the code's attempt limit. The outcome is only
    /// reported once the updated record was stored over the exact version
    /// it was checked against; otherwise the check is repeated on a fresh
    /// read.
    pub async fn verify_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> OtpResult<()> {
        let code = code.trim();
        if email.trim().is_empty() || code.is_empty() {
            return Err(OtpError::MissingFields);
        }
        let email = normalize_email(email);

        loop {
            let current = match self
                .store
                .latest(&email, purpose)
                .await
                .map_err(|e| Self::storage_error("otp_lookup_failed", &email, e))?
            {
                Some(record) if !record.is_used => record,
                _ => {
                    tracing::info!(
                        email = %mask_email(&email),
                        purpose = %purpose,
                        event = "otp_not_found",
                        "No pending OTP for address"
                    );
                    return Err(OtpError::InvalidOrExpired);
                }
            };

            let mut record = current.clone();
            let outcome = record.verify(code, self.config.max_attempts);

            let stored = self
                .store
                .compare_and_save(&current, &record)
                .await
                .map_err(|e| Self::storage_error("otp_update_failed", &email, e))?;
            if !stored {
                tracing::debug!(
                    email = %mask_email(&email),
                    purpose = %purpose,
                    event = "otp_update_conflict",
                    "OTP changed during verification, retrying"
                );
                continue;
            }

            match &outcome {
                Ok(()) => tracing::info!(
                    email = %mask_email(&email),
                    purpose = %purpose,
                    session_id = %record.id,
                    event = "otp_verified",
                    "OTP verified"
                ),
                Err(e) => tracing::warn!(
                    email = %mask_email(&email),
                    purpose = %purpose,
                    session_id = %record.id,
                    attempts = record.attempts,
                    reason = %e,
                    event = "otp_verification_failed",
                    "OTP verification failed"
                ),
            }

            return outcome;
        }
    }

    /// Remove expired codes from storage
    pub async fn cleanup_expired(&self) -> OtpResult<usize> {
        let removed = self.store.purge_expired().await.map_err(|e| {
            tracing::error!(error = %e, event = "otp_cleanup_failed", "Failed to purge expired OTPs");
            OtpError::Storage { message: e }
        })?;

        if removed > 0 {
            tracing::debug!(removed = removed, event = "otp_cleanup", "Purged expired OTPs");
        }
        Ok(removed)
    }

    async fn issue(
        &self,
        email: String,
        purpose: OtpPurpose,
        resent: bool,
    ) -> OtpResult<SendCodeResult> {
        let record = OtpCode::with_policy(
            email.clone(),
            purpose,
            self.config.code_length,
            self.config.expiry_seconds as i64,
        );

        self.store
            .replace(&record)
            .await
            .map_err(|e| Self::storage_error("otp_storage_failed", &email, e))?;

        tracing::info!(
            email = %mask_email(&email),
            purpose = %purpose,
            session_id = %record.id,
            resent = resent,
            event = "otp_generated",
            "Generated new OTP"
        );

        let delivered = match self.mailer.send_code(&email, &record.code, purpose).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    email = %mask_email(&email),
                    error = %e,
                    event = "otp_delivery_failed",
                    "Failed to deliver OTP email"
                );
                tracing::info!(
                    email = %email,
                    otp = %record.code,
                    purpose = %purpose,
                    event = "otp_console_fallback",
                    "OTP for undelivered email"
                );
                false
            }
        };

        Ok(SendCodeResult {
            email,
            expires_in: self.config.expires_in_label(),
            expires_at: record.expires_at,
            delivered,
            resent,
        })
    }

    fn checked_email(email: &str) -> OtpResult<String> {
        if !is_valid_email(email) {
            return Err(OtpError::InvalidEmail);
        }
        Ok(normalize_email(email))
    }

    fn storage_error(event: &'static str, email: &str, error: String) -> OtpError {
        tracing::error!(
            email = %mask_email(email),
            error = %error,
            event = event,
            "OTP storage operation failed"
        );
        OtpError::Storage { message: error }
    }
}

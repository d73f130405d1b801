//! Log-only mailer
//!
//! Writes issued codes to the log instead of mailing them. Used in
//! development and whenever no SMTP credentials are configured.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use mw_core::services::MailerTrait;
use mw_shared::OtpPurpose;

use super::templates;

/// Mailer that logs codes and counts them
#[derive(Clone, Default)]
pub struct LogMailer {
    sent: Arc<AtomicU64>,
}

impl LogMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codes logged so far
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MailerTrait for LogMailer {
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<(), String> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        info!(
            email = %email,
            otp = %code,
            purpose = %purpose,
            subject = templates::subject(purpose),
            event = "otp_logged",
            "Mail delivery disabled; OTP written to log"
        );
        Ok(())
    }
}

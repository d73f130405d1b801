//! Mail module for OTP delivery
//!
//! This module provides the mailers behind the OTP service. SMTP delivery
//! is feature-gated; without it, or without credentials, codes go to the
//! log.

pub mod log_mailer;
#[cfg(feature = "smtp-mail")]
pub mod smtp;
pub mod templates;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use mw_core::services::MailerTrait;
use mw_shared::{MailConfig, MailProvider, OtpConfig};

pub use log_mailer::LogMailer;
#[cfg(feature = "smtp-mail")]
pub use smtp::SmtpMailer;

/// Provider that will actually be used for `config`
///
/// SMTP without credentials degrades to log delivery.
pub fn effective_provider(config: &MailConfig) -> MailProvider {
    match config.provider {
        MailProvider::Smtp if config.has_credentials() => MailProvider::Smtp,
        _ => MailProvider::Log,
    }
}

/// Create the mailer selected by configuration
///
/// Falls back to the log mailer when SMTP cannot be set up.
pub fn create_mailer(config: &MailConfig, otp: &OtpConfig) -> Arc<dyn MailerTrait> {
    if config.provider == MailProvider::Smtp && !config.has_credentials() {
        tracing::warn!("SMTP credentials not configured, OTP codes will be logged instead of mailed");
    }

    match effective_provider(config) {
        MailProvider::Log => {
            tracing::info!(provider = "log", "Using log mailer");
            Arc::new(LogMailer::new())
        }
        #[cfg(feature = "smtp-mail")]
        MailProvider::Smtp => match SmtpMailer::new(config, otp.expires_in_label()) {
            Ok(mailer) => {
                tracing::info!(provider = "smtp", host = %config.smtp_host, "Using SMTP mailer");
                Arc::new(mailer)
            }
            Err(e) => {
                tracing::error!("Failed to initialize SMTP mailer: {}", e);
                tracing::warn!("Falling back to log mailer");
                Arc::new(LogMailer::new())
            }
        },
        #[cfg(not(feature = "smtp-mail"))]
        MailProvider::Smtp => {
            let _ = otp;
            tracing::warn!("SMTP mail requested but the smtp-mail feature is disabled, using log mailer");
            Arc::new(LogMailer::new())
        }
    }
}

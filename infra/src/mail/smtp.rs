//! SMTP mailer built on lettre
//!
//! Connects with implicit TLS on the configured port and retries once over
//! STARTTLS on port 587 when that connection fails.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, warn};

use mw_core::services::MailerTrait;
use mw_shared::{mask_email, MailConfig, OtpPurpose};

use super::templates;
use crate::InfrastructureError;

/// Port used for the STARTTLS retry
pub const STARTTLS_PORT: u16 = 587;

/// SMTP mailer
pub struct SmtpMailer {
    primary: AsyncSmtpTransport<Tokio1Executor>,
    fallback: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    expires_in: String,
}

impl SmtpMailer {
    /// Build transports for `config`
    ///
    /// `expires_in` is the code lifetime quoted in the message body.
    pub fn new(config: &MailConfig, expires_in: impl Into<String>) -> Result<Self, InfrastructureError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());
        let timeout = Some(Duration::from_secs(config.timeout_seconds));

        let primary = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| InfrastructureError::Mail(format!("Invalid SMTP relay: {}", e)))?
            .port(config.smtp_port)
            .credentials(credentials.clone())
            .timeout(timeout)
            .build();

        let fallback = if config.smtp_port == STARTTLS_PORT {
            None
        } else {
            let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                .map_err(|e| InfrastructureError::Mail(format!("Invalid SMTP relay: {}", e)))?
                .port(STARTTLS_PORT)
                .credentials(credentials)
                .timeout(timeout)
                .build();
            Some(transport)
        };

        let from = format!("{} <{}>", config.from_name, config.sender())
            .parse::<Mailbox>()
            .map_err(|e| InfrastructureError::Mail(format!("Invalid sender address: {}", e)))?;

        Ok(Self {
            primary,
            fallback,
            from,
            expires_in: expires_in.into(),
        })
    }

    fn build_message(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<Message, String> {
        let to = email
            .parse::<Mailbox>()
            .map_err(|e| format!("Invalid recipient address: {}", e))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(templates::subject(purpose))
            .header(ContentType::TEXT_HTML)
            .body(templates::html_body(code, purpose, &self.expires_in))
            .map_err(|e| format!("Failed to build email: {}", e))
    }
}

#[async_trait]
impl MailerTrait for SmtpMailer {
    async fn send_code(&self, email: &str, code: &str, purpose: OtpPurpose) -> Result<(), String> {
        let message = self.build_message(email, code, purpose)?;

        let error = match self.primary.send(message.clone()).await {
            Ok(_) => {
                debug!(email = %mask_email(email), event = "otp_mailed", "OTP email sent");
                return Ok(());
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            return Err(format!("SMTP send failed: {}", error));
        };

        warn!(
            email = %mask_email(email),
            error = %error,
            event = "smtp_fallback",
            "SMTP send failed, retrying over STARTTLS"
        );
        fallback
            .send(message)
            .await
            .map(|_| debug!(email = %mask_email(email), event = "otp_mailed", "OTP email sent"))
            .map_err(|e| format!("SMTP send failed: {}", e))
    }
}

//! Outbound mail configuration

use serde::{Deserialize, Serialize};

/// Mail delivery provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Codes are written to the log instead of being mailed
    #[default]
    Log,
    /// SMTP relay
    Smtp,
}

/// Mail configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// Delivery provider
    pub provider: MailProvider,

    /// SMTP relay host
    pub smtp_host: String,

    /// SMTP relay port
    pub smtp_port: u16,

    /// SMTP username
    pub username: String,

    /// SMTP password or app password
    pub password: String,

    /// Display name used in the From header
    pub from_name: String,

    /// Sender address; defaults to `username` when empty
    pub from_address: String,

    /// SMTP timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailProvider::Log,
            smtp_host: String::from("smtp.gmail.com"),
            smtp_port: 465,
            username: String::new(),
            password: String::new(),
            from_name: String::from("MindWell"),
            from_address: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl MailConfig {
    /// Whether SMTP credentials are present
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Effective sender address
    pub fn sender(&self) -> &str {
        if self.from_address.is_empty() {
            &self.username
        } else {
            &self.from_address
        }
    }
}

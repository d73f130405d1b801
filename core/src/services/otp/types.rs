//! Types for OTP service results

use chrono::{DateTime, Utc};

/// Reply message of a successful verification
pub const VERIFIED_MESSAGE: &str = "OTP verified successfully";

/// Added to issue responses when the mail could not be delivered
pub const DELIVERY_NOTE: &str = "Email service may be unavailable. OTP is logged in backend console.";

/// Result of issuing a code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCodeResult {
    /// Normalized address the code was issued for
    pub email: String,
    /// Human readable lifetime, e.g. "10 minutes"
    pub expires_in: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Whether the mailer accepted the message
    pub delivered: bool,
    /// Whether this code replaced one requested through resend
    pub resent: bool,
}

impl SendCodeResult {
    /// Message shown to the user
    pub fn message(&self) -> &'static str {
        match (self.resent, self.delivered) {
            (false, true) => "OTP sent successfully to your email",
            (false, false) => {
                "OTP generated successfully. Check your email or backend logs if email not received."
            }
            (true, true) => "OTP resent successfully to your email",
            (true, false) => {
                "OTP regenerated successfully. Check your email or backend logs if email not received."
            }
        }
    }

    pub fn note(&self) -> Option<&'static str> {
        (!self.delivered).then_some(DELIVERY_NOTE)
    }
}

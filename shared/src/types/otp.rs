//! Wire types of the OTP endpoints
//!
//! Field names follow the JSON the web frontend already speaks
//! (`type` for the purpose, camel-cased `expiresIn`).

use serde::{Deserialize, Serialize};
use validator::Validate;

/// What an issued code is meant to prove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    #[default]
    EmailVerification,
    PasswordReset,
    LoginVerification,
}

impl OtpPurpose {
    /// Wire tag of the purpose
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::EmailVerification => "email_verification",
            OtpPurpose::PasswordReset => "password_reset",
            OtpPurpose::LoginVerification => "login_verification",
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OtpPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email_verification" => Ok(OtpPurpose::EmailVerification),
            "password_reset" => Ok(OtpPurpose::PasswordReset),
            "login_verification" => Ok(OtpPurpose::LoginVerification),
            other => Err(format!("Unknown OTP purpose: {}", other)),
        }
    }
}

/// Body of `POST /otp/send`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Please enter a valid email address")
    )]
    #[serde(default)]
    pub email: String,

    #[serde(rename = "type", default)]
    pub purpose: OtpPurpose,
}

/// Body of `POST /otp/resend`; same shape as a send
pub type ResendOtpRequest = SendOtpRequest;

/// Body of `POST /otp/verify`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub otp: String,

    #[serde(rename = "type", default)]
    pub purpose: OtpPurpose,
}

/// Successful send/resend response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpIssuedResponse {
    pub message: String,
    pub email: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: String,
    /// Present when the mail could not be delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Successful verify response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpVerifiedResponse {
    pub message: String,
    pub verified: bool,
}

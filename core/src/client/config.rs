//! Configuration for the verification session

use std::time::Duration;

use mw_shared::config::otp::{
    DEFAULT_CODE_EXPIRY_SECONDS, DEFAULT_CODE_LENGTH, DEFAULT_RESEND_COOLDOWN_SECONDS,
};
use mw_shared::OtpPurpose;

/// Configuration for a verification session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Number of code slots
    pub code_length: usize,
    /// Seconds an issued code is presented as live
    pub expiry_window_seconds: u32,
    /// Seconds the resend control stays disabled after a resend
    pub cooldown_window_seconds: u32,
    /// Cooldown running when the session starts
    pub initial_cooldown_seconds: u32,
    /// Countdown granularity
    pub tick: Duration,
    /// Delay between verification and the redirect to sign-in
    pub redirect_delay: Duration,
    /// Purpose tag sent with every request
    pub purpose: OtpPurpose,
    /// Message carried to the sign-in step
    pub success_message: String,
    /// Shown when a verification fails without a reason
    pub verify_fallback_message: String,
    /// Shown when a resend fails without a reason
    pub resend_fallback_message: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            expiry_window_seconds: DEFAULT_CODE_EXPIRY_SECONDS as u32,
            cooldown_window_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS as u32,
            initial_cooldown_seconds: 0,
            tick: Duration::from_secs(1),
            redirect_delay: Duration::from_secs(2),
            purpose: OtpPurpose::EmailVerification,
            success_message: "Email verified successfully! You can now log in.".to_string(),
            verify_fallback_message: "Verification failed. Please try again.".to_string(),
            resend_fallback_message: "Failed to resend OTP. Please try again.".to_string(),
        }
    }
}

impl SessionConfig {
    /// Align code length and windows with a server-side OTP policy
    pub fn from_otp_config(otp: &mw_shared::OtpConfig) -> Self {
        Self {
            code_length: otp.code_length,
            expiry_window_seconds: u32::try_from(otp.expiry_seconds).unwrap_or(u32::MAX),
            cooldown_window_seconds: u32::try_from(otp.resend_cooldown_seconds).unwrap_or(u32::MAX),
            ..Default::default()
        }
    }
}

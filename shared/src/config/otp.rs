//! One-time passcode issuing configuration

use serde::{Deserialize, Serialize};

use crate::utils::duration_label;

/// Number of digits in an issued code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Lifetime of an issued code (10 minutes)
pub const DEFAULT_CODE_EXPIRY_SECONDS: u64 = 600;

/// Minimum spacing between two codes for the same address
pub const DEFAULT_RESEND_COOLDOWN_SECONDS: u64 = 60;

/// Verification attempts allowed per code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Server-side OTP policy
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Number of digits in a code
    pub code_length: usize,

    /// Seconds before an issued code expires
    pub expiry_seconds: u64,

    /// Seconds a client must wait before a resend is accepted
    pub resend_cooldown_seconds: u64,

    /// Verification attempts allowed per code
    pub max_attempts: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            expiry_seconds: DEFAULT_CODE_EXPIRY_SECONDS,
            resend_cooldown_seconds: DEFAULT_RESEND_COOLDOWN_SECONDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl OtpConfig {
    /// Human readable lifetime used in API responses, e.g. "10 minutes"
    pub fn expires_in_label(&self) -> String {
        duration_label(self.expiry_seconds)
    }

    /// Human readable resend cooldown, e.g. "1 minute"
    pub fn cooldown_label(&self) -> String {
        duration_label(self.resend_cooldown_seconds)
    }
}

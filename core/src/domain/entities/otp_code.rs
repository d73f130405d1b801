//! One-time passcode entity for email verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use mw_shared::OtpPurpose;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::OtpError;

/// Maximum number of verification attempts allowed
pub const MAX_ATTEMPTS: u32 = 3;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of a code (10 minutes)
pub const EXPIRATION_SECONDS: i64 = 600;

/// Longest code that still fits the numeric generator
const MAX_CODE_LENGTH: usize = 18;

/// An issued one-time passcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpCode {
    /// Unique identifier for the code
    pub id: Uuid,

    /// Normalized address the code was sent to
    pub email: String,

    /// The numeric code
    pub code: String,

    /// What the code proves
    pub purpose: OtpPurpose,

    /// Number of failed verification attempts
    pub attempts: u32,

    /// Timestamp when the code was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,

    /// Whether the code has been successfully used
    pub is_used: bool,
}

impl OtpCode {
    /// Creates a default six-digit code valid for ten minutes
    pub fn new(email: impl Into<String>, purpose: OtpPurpose) -> Self {
        Self::with_policy(email, purpose, CODE_LENGTH, EXPIRATION_SECONDS)
    }

    /// Creates a code of `length` digits valid for `expiry_seconds`
    pub fn with_policy(
        email: impl Into<String>,
        purpose: OtpPurpose,
        length: usize,
        expiry_seconds: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            code: Self::generate_code(length),
            purpose,
            attempts: 0,
            created_at: now,
            expires_at: now + Duration::seconds(expiry_seconds),
            is_used: false,
        }
    }

    /// Generates a numeric code without a leading zero using the OS CSPRNG
    pub fn generate_code(length: usize) -> String {
        let length = length.clamp(1, MAX_CODE_LENGTH);
        if length == 1 {
            return OsRng.gen_range(0..10u64).to_string();
        }
        let low = 10u64.pow(length as u32 - 1);
        let high = 10u64.pow(length as u32);
        OsRng.gen_range(low..high).to_string()
    }

    /// Checks if the code has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// A code is valid while it is unused, unexpired and under the attempt limit
    pub fn is_valid(&self, max_attempts: u32) -> bool {
        !self.is_used && !self.is_expired() && self.attempts < max_attempts
    }

    /// Verifies `input` against this code.
    ///
    /// Every failed check counts as an attempt; a match marks the code used.
    pub fn verify(&mut self, input: &str, max_attempts: u32) -> Result<(), OtpError> {
        if !self.is_valid(max_attempts) {
            self.attempts += 1;
            return Err(OtpError::InvalidOrExpired);
        }

        let matches = self.code.len() == input.len()
            && constant_time_eq(self.code.as_bytes(), input.as_bytes());
        if !matches {
            self.attempts += 1;
            return Err(OtpError::CodeMismatch {
                remaining_attempts: self.remaining_attempts(max_attempts),
            });
        }

        self.is_used = true;
        Ok(())
    }

    /// Gets the number of remaining verification attempts
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        max_attempts.saturating_sub(self.attempts)
    }

    /// Whether the code was created less than `seconds` ago
    pub fn created_within(&self, seconds: i64) -> bool {
        Utc::now() - self.created_at < Duration::seconds(seconds)
    }

    /// Seconds until `created_at + seconds`, zero once passed
    pub fn seconds_until(&self, seconds: i64) -> u64 {
        let remaining = (self.created_at + Duration::seconds(seconds)) - Utc::now();
        remaining.num_seconds().max(0) as u64
    }

    /// Gets the time remaining until expiration
    pub fn time_until_expiration(&self) -> Duration {
        let now = Utc::now();
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

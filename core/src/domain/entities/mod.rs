//! Domain entities representing core business objects.

pub mod otp_code;

pub use otp_code::{OtpCode, CODE_LENGTH, EXPIRATION_SECONDS, MAX_ATTEMPTS};

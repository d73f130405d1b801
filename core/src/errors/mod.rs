//! Error types of the verification core.

mod types;

#[cfg(test)]
mod tests;

pub use types::{GatewayError, OtpError, SessionError};

/// Result of OTP issuing operations
pub type OtpResult<T> = Result<T, OtpError>;

/// Result of verification session operations
pub type SessionResult<T> = Result<T, SessionError>;

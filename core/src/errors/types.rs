//! Error enums for the OTP service, the verification gateway and the
//! client verification session.
//!
//! Display strings of user-facing variants are shown verbatim by the web
//! frontend, so they are complete sentences.

use thiserror::Error;

/// Errors raised while issuing or checking one-time passcodes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Email and OTP are required")]
    MissingFields,

    #[error("Invalid or expired OTP")]
    InvalidOrExpired,

    #[error("Invalid OTP code")]
    CodeMismatch { remaining_attempts: u32 },

    #[error("Please wait {wait} before requesting a new OTP")]
    ResendTooSoon {
        wait: String,
        retry_after_seconds: u64,
    },

    #[error("OTP storage failure: {message}")]
    Storage { message: String },
}

impl OtpError {
    /// Whether the caller can fix the request (as opposed to a server fault)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, OtpError::Storage { .. })
    }

    /// Whether the code itself was refused
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            OtpError::InvalidOrExpired | OtpError::CodeMismatch { .. }
        )
    }
}

/// Failures talking to the external verification service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Verification service unreachable: {0}")]
    Transport(String),

    #[error("Verification service error ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Service {
        status: u16,
        message: Option<String>,
    },

    #[error("Unexpected verification service response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Reason reported by the service, if it gave one
    pub fn service_message(&self) -> Option<&str> {
        match self {
            GatewayError::Service { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Outcomes of a verification session operation other than success
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// No identity was handed over and none is pending; the flow was
    /// redirected to identity collection
    #[error("No email address is awaiting verification")]
    NoPendingIdentity,

    #[error("{message}")]
    VerificationRejected { message: String },

    #[error("{message}")]
    VerificationService { message: String },

    #[error("{message}")]
    ResendRejected { message: String },

    #[error("{message}")]
    ResendService { message: String },

    /// A response arrived after the session moved on; it was discarded
    #[error("Response superseded by a newer attempt")]
    StaleResponse,

    #[error("Resend available in {remaining_seconds} seconds")]
    CooldownActive { remaining_seconds: u32 },

    #[error("Code must be exactly {expected} digits")]
    InvalidCode { expected: usize },

    #[error("Input is disabled while a request is in flight")]
    InputDisabled,

    #[error("Email address already verified")]
    AlreadyVerified,

    #[error("Verification session closed")]
    Closed,
}

impl SessionError {
    /// Errors rendered inline next to the code entry
    pub fn is_user_visible(&self) -> bool {
        matches!(
            self,
            SessionError::VerificationRejected { .. }
                | SessionError::VerificationService { .. }
                | SessionError::ResendRejected { .. }
                | SessionError::ResendService { .. }
        )
    }
}

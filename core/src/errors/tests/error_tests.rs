//! Unit tests for error types

use crate::errors::{GatewayError, OtpError, SessionError};

#[test]
fn test_otp_error_messages_match_frontend_copy() {
    assert_eq!(OtpError::InvalidOrExpired.to_string(), "Invalid or expired OTP");
    assert_eq!(
        OtpError::CodeMismatch { remaining_attempts: 2 }.to_string(),
        "Invalid OTP code"
    );
    assert_eq!(
        OtpError::ResendTooSoon {
            wait: "1 minute".to_string(),
            retry_after_seconds: 42,
        }
        .to_string(),
        "Please wait 1 minute before requesting a new OTP"
    );
}

#[test]
fn test_otp_error_classification() {
    assert!(OtpError::InvalidEmail.is_client_error());
    assert!(!OtpError::Storage { message: "down".into() }.is_client_error());
    assert!(OtpError::InvalidOrExpired.is_rejection());
    assert!(!OtpError::MissingFields.is_rejection());
}

#[test]
fn test_gateway_service_message() {
    let error = GatewayError::Service {
        status: 500,
        message: Some("Failed to verify OTP".into()),
    };
    assert_eq!(error.service_message(), Some("Failed to verify OTP"));
    assert!(error.to_string().contains("500"));

    let error = GatewayError::Transport("connection refused".into());
    assert_eq!(error.service_message(), None);
}

#[test]
fn test_session_error_visibility() {
    assert!(SessionError::VerificationRejected { message: "Invalid OTP code".into() }.is_user_visible());
    assert!(SessionError::ResendService { message: "down".into() }.is_user_visible());
    assert!(!SessionError::StaleResponse.is_user_visible());
    assert!(!SessionError::NoPendingIdentity.is_user_visible());
    assert!(!SessionError::CooldownActive { remaining_seconds: 10 }.is_user_visible());
}

#[test]
fn test_session_error_displays_service_message() {
    let error = SessionError::VerificationRejected { message: "Invalid code".into() };
    assert_eq!(error.to_string(), "Invalid code");
}

use mw_shared::OtpPurpose;

use crate::mail::templates::{html_body, subject};

#[test]
fn test_subject_per_purpose() {
    assert_eq!(subject(OtpPurpose::EmailVerification), "Verify Your MindWell Account");
    assert_eq!(subject(OtpPurpose::LoginVerification), "Your MindWell Login Code");
    assert_eq!(subject(OtpPurpose::PasswordReset), "Your MindWell Verification Code");
}

#[test]
fn test_body_carries_code_and_lifetime() {
    let body = html_body("482915", OtpPurpose::EmailVerification, "10 minutes");
    assert!(body.contains("482915"));
    assert!(body.contains("This code will expire in 10 minutes."));
    assert!(body.contains("MindWell"));
}

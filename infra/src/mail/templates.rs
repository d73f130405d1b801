//! Verification email content

use mw_shared::OtpPurpose;

/// Subject line for a code sent for `purpose`
pub fn subject(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::EmailVerification => "Verify Your MindWell Account",
        OtpPurpose::LoginVerification => "Your MindWell Login Code",
        OtpPurpose::PasswordReset => "Your MindWell Verification Code",
    }
}

fn intro(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::EmailVerification => {
            "Thank you for signing up with MindWell. Please use the following code to verify your email address:"
        }
        OtpPurpose::LoginVerification => "Use the following code to finish signing in to MindWell:",
        OtpPurpose::PasswordReset => "Use the following code to reset your MindWell password:",
    }
}

/// HTML body carrying `code`, valid for `expires_in` (e.g. "10 minutes")
pub fn html_body(code: &str, purpose: OtpPurpose, expires_in: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; background-color: #f4f4f7; margin: 0; padding: 24px;">
    <div style="max-width: 480px; margin: 0 auto; background: #ffffff; border-radius: 8px; overflow: hidden;">
      <div style="background-color: #4f46e5; color: #ffffff; padding: 20px; text-align: center;">
        <h1 style="margin: 0; font-size: 24px;">MindWell</h1>
      </div>
      <div style="padding: 24px; color: #333333;">
        <p>{intro}</p>
        <p style="font-size: 32px; font-weight: bold; letter-spacing: 8px; text-align: center; margin: 24px 0;">{code}</p>
        <p>This code will expire in {expires_in}.</p>
        <p style="color: #888888; font-size: 12px;">If you did not request this code, you can safely ignore this email.</p>
      </div>
    </div>
  </body>
</html>"#,
        intro = intro(purpose),
        code = code,
        expires_in = expires_in,
    )
}

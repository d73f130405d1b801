//! One-time passcode route handlers
//!
//! This module contains the endpoints used by the signup verification flow:
//! - `POST /api/otp/send`
//! - `POST /api/otp/verify`
//! - `POST /api/otp/resend`

pub mod resend;
pub mod send;
pub mod verify;

use actix_web::{web, Scope};
use validator::Validate;

use mw_core::services::SendCodeResult;
use mw_shared::{OtpIssuedResponse, SendOtpRequest};

use crate::errors::ApiError;

pub use resend::resend_otp;
pub use send::send_otp;
pub use verify::verify_otp;

/// The `/otp` scope
pub fn scope() -> Scope {
    web::scope("/otp")
        .route("/send", web::post().to(send_otp))
        .route("/verify", web::post().to(verify_otp))
        .route("/resend", web::post().to(resend_otp))
}

/// Check the address of a send or resend request
///
/// Reports one message per failing field, the first rule that failed.
pub(crate) fn validate_email_request(request: &SendOtpRequest) -> Result<(), ApiError> {
    let Err(errors) = request.validate() else {
        return Ok(());
    };

    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    let messages = fields
        .into_iter()
        .filter_map(|(field, errors)| {
            errors.first().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .collect();
    Err(ApiError::Validation(messages))
}

pub(crate) fn issued_response(result: &SendCodeResult) -> OtpIssuedResponse {
    OtpIssuedResponse {
        message: result.message().to_string(),
        email: result.email.clone(),
        expires_in: result.expires_in.clone(),
        note: result.note().map(str::to_string),
    }
}

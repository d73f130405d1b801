use actix_web::{web, HttpResponse};

use mw_shared::{mask_email, SendOtpRequest};

use super::{issued_response, validate_email_request};
use crate::app::AppState;
use crate::errors::ApiError;

/// Handler for POST /api/otp/send
///
/// Issues a fresh code, replacing any previous one for the address and
/// purpose.
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "type": "email_verification" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "message": "OTP sent successfully to your email",
///     "email": "user@example.com",
///     "expiresIn": "10 minutes"
/// }
/// ```
///
/// A `note` field is added when the email could not be delivered.
///
/// ## Errors
/// - 400 `{ "message": "Validation failed", "errors": [...] }`
/// - 500 `{ "message": "Failed to send OTP" }`
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    tracing::info!(
        email = %mask_email(&request.email),
        purpose = %request.purpose,
        "Processing send OTP request"
    );

    validate_email_request(&request)?;

    let result = state
        .otp_service
        .send_code(&request.email, request.purpose)
        .await
        .map_err(|e| ApiError::from_otp(e, "Failed to send OTP"))?;

    Ok(HttpResponse::Ok().json(issued_response(&result)))
}

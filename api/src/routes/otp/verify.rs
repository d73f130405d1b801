use actix_web::{web, HttpResponse};

use mw_core::services::VERIFIED_MESSAGE;
use mw_shared::{mask_email, OtpVerifiedResponse, VerifyOtpRequest};

use crate::app::AppState;
use crate::errors::ApiError;

/// Handler for POST /api/otp/verify
///
/// # Request Body
///
/// ```json
/// { "email": "user@example.com", "otp": "123456", "type": "email_verification" }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "message": "OTP verified successfully", "verified": true }
/// ```
///
/// ## Errors
/// - 400 `{ "message": "Email and OTP are required" }`
/// - 400 `{ "message": "Invalid or expired OTP" }`
/// - 400 `{ "message": "Invalid OTP code" }`
/// - 500 `{ "message": "Failed to verify OTP" }`
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    tracing::info!(
        email = %mask_email(&request.email),
        purpose = %request.purpose,
        "Processing verify OTP request"
    );

    state
        .otp_service
        .verify_code(&request.email, &request.otp, request.purpose)
        .await
        .map_err(|e| ApiError::from_otp(e, "Failed to verify OTP"))?;

    Ok(HttpResponse::Ok().json(OtpVerifiedResponse {
        message: VERIFIED_MESSAGE.to_string(),
        verified: true,
    }))
}

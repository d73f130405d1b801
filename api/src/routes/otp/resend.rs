use actix_web::{web, HttpResponse};

use mw_shared::{mask_email, ResendOtpRequest};

use super::{issued_response, validate_email_request};
use crate::app::AppState;
use crate::errors::ApiError;

/// Handler for POST /api/otp/resend
///
/// Same body and success shape as a send. Refused with 429 and a
/// `Retry-After` header while the previous code is inside the resend
/// cooldown.
pub async fn resend_otp(
    state: web::Data<AppState>,
    request: web::Json<ResendOtpRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    tracing::info!(
        email = %mask_email(&request.email),
        purpose = %request.purpose,
        "Processing resend OTP request"
    );

    validate_email_request(&request)?;

    let result = state
        .otp_service
        .resend_code(&request.email, request.purpose)
        .await
        .map_err(|e| ApiError::from_otp(e, "Failed to resend OTP"))?;

    Ok(HttpResponse::Ok().json(issued_response(&result)))
}

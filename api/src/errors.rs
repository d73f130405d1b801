//! Error responses of the HTTP API
//!
//! Every failure is rendered as a `{ "message": ... }` body, plus an
//! `errors` list for validation failures.

use actix_web::http::{header, StatusCode};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use mw_core::errors::OtpError;
use mw_shared::MessageResponse;

/// Message of every validation failure response
pub const VALIDATION_FAILED: &str = "Validation failed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("{message}")]
    TooManyRequests {
        message: String,
        retry_after_seconds: u64,
    },

    #[error("{0}")]
    NotFound(String),

    /// Server fault; the message names the failed operation only
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Map a service error, using `failure` as the message for server faults
    pub fn from_otp(error: OtpError, failure: &'static str) -> Self {
        match error {
            OtpError::InvalidEmail => ApiError::Validation(vec![error.to_string()]),
            OtpError::ResendTooSoon {
                retry_after_seconds,
                ..
            } => ApiError::TooManyRequests {
                message: error.to_string(),
                retry_after_seconds,
            },
            OtpError::Storage { .. } => ApiError::Internal(failure),
            OtpError::MissingFields | OtpError::InvalidOrExpired | OtpError::CodeMismatch { .. } => {
                ApiError::BadRequest(error.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        let body = match self {
            ApiError::Validation(errors) => MessageResponse::with_errors(VALIDATION_FAILED, errors.clone()),
            ApiError::TooManyRequests {
                message,
                retry_after_seconds,
            } => {
                response.insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()));
                MessageResponse::new(message.clone())
            }
            other => MessageResponse::new(other.to_string()),
        };
        response.json(body)
    }
}

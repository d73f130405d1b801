//! Type definitions shared by the API server and verification clients
//!
//! - `otp` - request/response bodies of the `/otp` endpoints and the code purpose
//! - `response` - generic message and health payloads

pub mod otp;
pub mod response;

pub use otp::{
    OtpIssuedResponse, OtpPurpose, OtpVerifiedResponse, ResendOtpRequest, SendOtpRequest,
    VerifyOtpRequest,
};
pub use response::{HealthResponse, HealthStatus, MessageResponse};

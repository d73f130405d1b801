//! In-process verification gateway backed by [`OtpService`]

use async_trait::async_trait;
use mw_shared::OtpPurpose;

use crate::client::{ResendReply, VerificationGateway, VerifyReply};
use crate::errors::{GatewayError, OtpError};

use super::service::OtpService;
use super::types::VERIFIED_MESSAGE;

/// Map a service failure the way the HTTP API reports it: client errors
/// become refusals, storage faults become a 500.
fn service_fault(error: &OtpError, message: &str) -> Option<GatewayError> {
    (!error.is_client_error()).then(|| GatewayError::Service {
        status: 500,
        message: Some(message.to_string()),
    })
}

#[async_trait]
impl VerificationGateway for OtpService {
    async fn verify(
        &self,
        identity: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<VerifyReply, GatewayError> {
        match self.verify_code(identity, code, purpose).await {
            Ok(()) => Ok(VerifyReply::verified(VERIFIED_MESSAGE)),
            Err(e) => match service_fault(&e, "Failed to verify OTP") {
                Some(fault) => Err(fault),
                None => Ok(VerifyReply::rejected(e.to_string())),
            },
        }
    }

    async fn resend(&self, identity: &str, purpose: OtpPurpose) -> Result<ResendReply, GatewayError> {
        match self.resend_code(identity, purpose).await {
            Ok(result) => Ok(ResendReply::sent(result.message())),
            Err(e) => match service_fault(&e, "Failed to resend OTP") {
                Some(fault) => Err(fault),
                None => Ok(ResendReply::refused(e.to_string())),
            },
        }
    }
}

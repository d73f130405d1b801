//! HTTP client for the OTP verification API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use mw_core::client::{ResendReply, VerificationGateway, VerifyReply};
use mw_core::errors::GatewayError;
use mw_shared::{
    mask_email, ClientConfig, MessageResponse, OtpIssuedResponse, OtpPurpose, OtpVerifiedResponse,
    ResendOtpRequest, VerifyOtpRequest,
};

use crate::InfrastructureError;

/// Verification gateway calling `POST {base}/otp/verify` and
/// `POST {base}/otp/resend`
#[derive(Clone)]
pub struct HttpVerificationGateway {
    client: Client,
    base_url: String,
}

/// Outcome of a call after status classification
enum Answer<T> {
    Accepted(T),
    Refused(Option<String>),
}

impl HttpVerificationGateway {
    /// Create a gateway from client settings
    pub fn new(config: &ClientConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self::with_client(client, &config.api_base_url))
    }

    /// Create a gateway with default settings against `base_url`
    pub fn with_base_url(base_url: &str) -> Result<Self, InfrastructureError> {
        Self::new(&ClientConfig {
            api_base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<Answer<T>, GatewayError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send POST request to {}: {}", url, e);
                GatewayError::Transport(e.to_string())
            })?;

        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "Verification API responded");

        if status.is_success() {
            let parsed = response
                .json::<T>()
                .await
                .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
            return Ok(Answer::Accepted(parsed));
        }

        let message = error_message(response).await;
        if status.is_client_error() {
            Ok(Answer::Refused(message))
        } else {
            Err(GatewayError::Service {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// `message` of an error body, if the body has one
async fn error_message(response: Response) -> Option<String> {
    let status: StatusCode = response.status();
    match response.json::<MessageResponse>().await {
        Ok(body) => Some(body.message),
        Err(e) => {
            debug!(status = status.as_u16(), error = %e, "Error response without a message body");
            None
        }
    }
}

#[async_trait]
impl VerificationGateway for HttpVerificationGateway {
    async fn verify(
        &self,
        identity: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<VerifyReply, GatewayError> {
        debug!(email = %mask_email(identity), purpose = %purpose, "Submitting OTP");
        let body = VerifyOtpRequest {
            email: identity.to_string(),
            otp: code.to_string(),
            purpose,
        };

        match self.post::<_, OtpVerifiedResponse>("/otp/verify", &body).await? {
            Answer::Accepted(reply) => Ok(VerifyReply {
                verified: reply.verified,
                message: Some(reply.message),
            }),
            Answer::Refused(message) => Ok(VerifyReply {
                verified: false,
                message,
            }),
        }
    }

    async fn resend(&self, identity: &str, purpose: OtpPurpose) -> Result<ResendReply, GatewayError> {
        debug!(email = %mask_email(identity), purpose = %purpose, "Requesting OTP resend");
        let body = ResendOtpRequest {
            email: identity.to_string(),
            purpose,
        };

        match self.post::<_, OtpIssuedResponse>("/otp/resend", &body).await? {
            Answer::Accepted(reply) => Ok(ResendReply::sent(reply.message)),
            Answer::Refused(message) => Ok(ResendReply { ok: false, message }),
        }
    }
}

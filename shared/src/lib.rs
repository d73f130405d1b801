//! Shared utilities and common types for the MindWell verification services
//!
//! This crate provides common functionality used across all workspace members:
//! - Configuration types and loading
//! - Wire types of the OTP endpoints
//! - Email validation and masking helpers

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CacheType, ClientConfig, ConfigError, CorsConfig, Environment,
    LogFormat, LoggingConfig, MailConfig, MailProvider, OtpConfig, ServerConfig,
};
pub use types::{
    HealthResponse, HealthStatus, MessageResponse, OtpIssuedResponse, OtpPurpose,
    OtpVerifiedResponse, ResendOtpRequest, SendOtpRequest, VerifyOtpRequest,
};
pub use utils::{duration_label, is_valid_email, mask_email, normalize_email};

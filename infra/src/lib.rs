//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer of MindWell email
//! verification. It provides concrete implementations for the traits
//! declared in `mw_core`.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: OTP record stores (in-memory and Redis)
//! - **Mail**: code delivery (log output and SMTP)
//! - **Client**: adapters for the verification session (HTTP gateway,
//!   durable pending-identity stores, navigation and toast sinks)
//!
//! ## Features
//!
//! - `redis-cache`: Enable the Redis OTP store (default)
//! - `smtp-mail`: Enable SMTP delivery through lettre (default)

// Re-export core types for convenience
pub use mw_core::errors::*;

/// Cache module - OTP record storage
pub mod cache;

/// Mail module - OTP delivery
pub mod mail;

/// Client module - adapters for the verification session
pub mod client;

pub use cache::{create_otp_store, InMemoryOtpStore};
pub use client::{
    ChannelNavigator, FilePendingIdentityStore, HttpVerificationGateway,
    MemoryPendingIdentityStore, TracingNotifier,
};
pub use mail::{create_mailer, LogMailer};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local file access error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Mail delivery error
    #[error("Mail delivery error: {0}")]
    Mail(String),
}

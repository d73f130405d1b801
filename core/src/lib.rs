//! # MindWell Core
//!
//! Core logic of MindWell email verification.
//! This crate contains the one-time passcode entity, the server-side OTP
//! service, the client verification session and the error types shared by
//! both sides.

pub mod client;
pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;

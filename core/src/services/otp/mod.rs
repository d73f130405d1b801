//! OTP issuing service for email verification
//!
//! This module provides the server side of the verification flow:
//! - Code generation, storage and delivery by email
//! - Resend cooldown per address and purpose
//! - Code verification with attempt tracking
//! - An in-process adapter so a client session can talk to the service directly

mod gateway;
mod service;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use service::OtpService;
pub use traits::{MailerTrait, OtpStoreTrait};
pub use types::{SendCodeResult, DELIVERY_NOTE, VERIFIED_MESSAGE};

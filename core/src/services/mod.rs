//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    MailerTrait, OtpService, OtpStoreTrait, SendCodeResult, DELIVERY_NOTE, VERIFIED_MESSAGE,
};

//! Client-side email verification session
//!
//! This module drives one pending verification from the browser or app side:
//! - Segmented code entry with explicit focus and completion tracking
//! - Code-expiry and resend-cooldown countdowns
//! - The session controller submitting codes and resend requests
//! - Collaborator traits for the verification service, durable storage,
//!   navigation and toasts

mod config;
mod countdown;
mod entry;
mod session;
mod traits;
mod types;

#[cfg(test)]
mod tests;

pub use config::SessionConfig;
pub use countdown::{format_clock, CountdownPair};
pub use entry::{CodeEntry, EntryOutcome};
pub use session::{SessionBuilder, VerificationSession};
pub use traits::{NavigationSink, NotificationSink, PendingIdentityStore, VerificationGateway};
pub use types::{
    EntryEvent, FlowStep, NoticeKind, Redirect, ResendReply, SessionPhase, SessionSnapshot,
    VerifyReply, PENDING_IDENTITY_KEY,
};

//! Values exchanged between the verification session, its collaborators
//! and the view layer.

use serde::{Deserialize, Serialize};

/// Durable slot holding the address awaiting verification
pub const PENDING_IDENTITY_KEY: &str = "pendingVerificationEmail";

/// Verification-axis state of a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for a complete code
    Idle,
    /// A verify request is in flight
    Submitting,
    /// Terminal: the code matched
    Verified,
    /// The last submission was refused; waiting for a corrected code
    Failed { message: String },
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionPhase::Verified)
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "idle"),
            SessionPhase::Submitting => write!(f, "submitting"),
            SessionPhase::Verified => write!(f, "verified"),
            SessionPhase::Failed { message } => write!(f, "failed: {}", message),
        }
    }
}

/// Answer of the verification service to a submitted code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReply {
    pub verified: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl VerifyReply {
    pub fn verified(message: impl Into<String>) -> Self {
        Self {
            verified: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            verified: false,
            message: Some(message.into()),
        }
    }
}

/// Answer of the verification service to a resend request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendReply {
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl ResendReply {
    pub fn sent(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: Some(message.into()),
        }
    }

    pub fn refused(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: Some(message.into()),
        }
    }
}

/// Steps of the signup flow the session can hand control to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    /// Where an email address is collected (signup)
    IdentityCollection,
    /// Where a verified user signs in
    SignIn,
}

impl FlowStep {
    /// Route of the step in the web frontend
    pub fn path(&self) -> &'static str {
        match self {
            FlowStep::IdentityCollection => "/signup",
            FlowStep::SignIn => "/login",
        }
    }
}

/// Navigation request emitted by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub step: FlowStep,
    pub identity: Option<String>,
    pub message: Option<String>,
}

impl Redirect {
    pub fn to(step: FlowStep) -> Self {
        Self {
            step,
            identity: None,
            message: None,
        }
    }

    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.identity = Some(identity.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// Input events delivered by the segmented code entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryEvent {
    /// Text typed or pasted into a slot; only its last character is kept
    Character { slot: usize, text: String },
    /// Backspace pressed while `slot` had focus
    Backspace { slot: usize },
}

impl EntryEvent {
    pub fn character(slot: usize, text: impl Into<String>) -> Self {
        EntryEvent::Character {
            slot,
            text: text.into(),
        }
    }

    pub fn backspace(slot: usize) -> Self {
        EntryEvent::Backspace { slot }
    }
}

/// Point-in-time view of a session for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub identity: String,
    pub phase: SessionPhase,
    pub resend_in_flight: bool,
    pub expiry_seconds: u32,
    pub cooldown_seconds: u32,
    pub slots: Vec<Option<char>>,
    pub active_index: usize,
    pub input_disabled: bool,
    pub error: Option<String>,
}

impl SessionSnapshot {
    /// Whether the resend control should be enabled
    pub fn can_resend(&self) -> bool {
        self.cooldown_seconds == 0 && !self.resend_in_flight && !self.phase.is_terminal()
    }

    /// Whether the entered code may still be live
    pub fn code_is_live(&self) -> bool {
        self.expiry_seconds > 0
    }
}

//! Code-expiry and resend-cooldown counters.
//!
//! The two counters are independent; the session drives them from its own
//! timer tasks and only [`CountdownPair::restart`] touches both at once.

/// Remaining seconds of the code lifetime and of the resend cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownPair {
    expiry_window: u32,
    cooldown_window: u32,
    expiry: u32,
    cooldown: u32,
}

impl CountdownPair {
    pub fn new(expiry_window: u32, cooldown_window: u32, initial_cooldown: u32) -> Self {
        Self {
            expiry_window,
            cooldown_window,
            expiry: expiry_window,
            cooldown: initial_cooldown,
        }
    }

    pub fn expiry_remaining(&self) -> u32 {
        self.expiry
    }

    pub fn cooldown_remaining(&self) -> u32 {
        self.cooldown
    }

    /// Decrement the code lifetime, returning the new value.
    /// Stays at zero once reached.
    pub fn tick_expiry(&mut self) -> u32 {
        self.expiry = self.expiry.saturating_sub(1);
        self.expiry
    }

    /// Decrement the resend cooldown, returning the new value
    pub fn tick_cooldown(&mut self) -> u32 {
        self.cooldown = self.cooldown.saturating_sub(1);
        self.cooldown
    }

    /// A fresh code was issued: full lifetime and full cooldown
    pub fn restart(&mut self) {
        self.expiry = self.expiry_window;
        self.cooldown = self.cooldown_window;
    }

    pub fn is_code_live(&self) -> bool {
        self.expiry > 0
    }

    pub fn can_resend(&self) -> bool {
        self.cooldown == 0
    }

    /// Remaining lifetime as `m:ss`
    pub fn format_expiry(&self) -> String {
        format_clock(self.expiry)
    }
}

/// Format seconds as `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

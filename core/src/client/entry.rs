//! Segmented code entry.
//!
//! A fixed number of single-digit slots with one focused slot. Every input
//! event is a pure transition on [`CodeEntry`]; the view only renders the
//! resulting state and moves focus to [`CodeEntry::active_index`].

use mw_shared::config::otp::DEFAULT_CODE_LENGTH;

/// Result of applying an input event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The event was refused (disabled entry, bad slot or non-digit)
    Ignored,
    /// The buffer or focus changed
    Updated,
    /// Every slot is now filled with a value not reported before
    Completed(String),
}

/// State of the segmented code input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeEntry {
    slots: Vec<Option<char>>,
    active: usize,
    disabled: bool,
    error: Option<String>,
    // Last value reported as complete; cleared when a slot empties
    last_completed: Option<String>,
}

impl Default for CodeEntry {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeEntry {
    /// Creates an empty entry; a zero length is treated as one slot
    pub fn new(length: usize) -> Self {
        Self {
            slots: vec![None; length.max(1)],
            active: 0,
            disabled: false,
            error: None,
            last_completed: None,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn slots(&self) -> &[Option<char>] {
        &self.slots
    }

    /// Slot that should hold focus, always within `[0, len - 1]`
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Concatenation of the filled slots
    pub fn value(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Show slots in the error state; the typed digits stay in place
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Text arrived in `slot`.
    ///
    /// Only the last character is kept, which is what mobile autofill and
    /// paste produce. Empty text clears the slot and moves focus back.
    pub fn enter(&mut self, slot: usize, text: &str) -> EntryOutcome {
        if self.disabled || slot >= self.slots.len() {
            return EntryOutcome::Ignored;
        }

        match text.chars().last() {
            Some(ch) if ch.is_ascii_digit() => {
                self.slots[slot] = Some(ch);
                self.focus(slot + 1);
            }
            Some(_) => return EntryOutcome::Ignored,
            None => {
                self.slots[slot] = None;
                self.focus(slot.saturating_sub(1));
            }
        }

        self.check_completion()
    }

    /// Backspace pressed in `slot`: clears the previous slot and focuses it.
    /// The first slot has no previous slot, so backspace there does nothing.
    pub fn backspace(&mut self, slot: usize) -> EntryOutcome {
        if self.disabled || slot == 0 || slot >= self.slots.len() {
            return EntryOutcome::Ignored;
        }

        self.slots[slot - 1] = None;
        self.focus(slot - 1);
        self.check_completion()
    }

    /// Empty every slot and focus the first one
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.active = 0;
        self.error = None;
        self.last_completed = None;
    }

    fn focus(&mut self, index: usize) {
        self.active = index.min(self.slots.len() - 1);
    }

    fn check_completion(&mut self) -> EntryOutcome {
        if !self.is_complete() {
            self.last_completed = None;
            return EntryOutcome::Updated;
        }

        let value = self.value();
        if self.last_completed.as_deref() == Some(value.as_str()) {
            return EntryOutcome::Updated;
        }
        self.last_completed = Some(value.clone());
        EntryOutcome::Completed(value)
    }
}

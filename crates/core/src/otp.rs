//! One-time-password entry model.
//!
//! The code is typed into [`OTP_LENGTH`] independent single-digit boxes.
//! [`OtpInput`] owns the box contents and which box has focus, so any skin
//! (terminal, web, native) can render it without re-implementing the
//! auto-advance and backspace rules.

use crate::error::CoreError;

/// Number of digits in a code.
pub const OTP_LENGTH: usize = 4;

/// Server-side validity window of a freshly dispatched code, in seconds.
pub const OTP_VALIDITY_SECS: u32 = 120;

pub const MSG_OTP_INCOMPLETE: &str = "Please enter the complete 4-digit OTP code";

/// Check that a joined code is exactly [`OTP_LENGTH`] ASCII digits.
pub fn validate_code(code: &str) -> Result<(), CoreError> {
    if code.len() != OTP_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::validation(MSG_OTP_INCOMPLETE));
    }
    Ok(())
}

/// Contents and focus of the digit boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtpInput {
    slots: [Option<char>; OTP_LENGTH],
    focus: usize,
}

impl OtpInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[Option<char>; OTP_LENGTH] {
        &self.slots
    }

    /// Index of the box that currently has focus.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Move focus to `slot` (e.g. the user clicked a box).
    pub fn focus_slot(&mut self, slot: usize) -> Result<(), CoreError> {
        check_slot(slot)?;
        self.focus = slot;
        Ok(())
    }

    /// Apply the new value of box `slot` and return the box that should
    /// have focus afterwards.
    ///
    /// Non-digit characters are discarded. A value that still holds more
    /// than one digit is ignored entirely. An empty value clears the box.
    /// Entering a digit in any box but the last advances focus.
    pub fn enter(&mut self, slot: usize, value: &str) -> Result<usize, CoreError> {
        check_slot(slot)?;
        let mut digits = value.chars().filter(char::is_ascii_digit);
        let first = digits.next();
        if digits.next().is_some() {
            return Ok(self.focus);
        }

        self.slots[slot] = first;
        self.focus = match first {
            Some(_) if slot + 1 < OTP_LENGTH => slot + 1,
            _ => slot,
        };
        Ok(self.focus)
    }

    /// Enter a single keystroke into the focused box.
    pub fn type_char(&mut self, ch: char) -> usize {
        if !ch.is_ascii_digit() {
            return self.focus;
        }
        let mut buf = [0u8; 4];
        let focus = self.focus;
        self.enter(focus, ch.encode_utf8(&mut buf))
            .unwrap_or(focus)
    }

    /// Handle Backspace pressed in box `slot`.
    ///
    /// A filled box is cleared and keeps focus; on an empty box (other
    /// than the first) focus moves back one box.
    pub fn backspace(&mut self, slot: usize) -> Result<usize, CoreError> {
        check_slot(slot)?;
        if self.slots[slot].is_some() {
            self.slots[slot] = None;
            self.focus = slot;
        } else if slot > 0 {
            self.focus = slot - 1;
        } else {
            self.focus = 0;
        }
        Ok(self.focus)
    }

    /// Replace all boxes with the digits of a pasted or typed code.
    ///
    /// Non-digits are dropped and at most [`OTP_LENGTH`] digits are kept.
    pub fn fill(&mut self, code: &str) {
        self.clear();
        let mut count = 0;
        for (slot, digit) in code
            .chars()
            .filter(char::is_ascii_digit)
            .take(OTP_LENGTH)
            .enumerate()
        {
            self.slots[slot] = Some(digit);
            count = slot + 1;
        }
        self.focus = count.min(OTP_LENGTH - 1);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Filled boxes joined in order. Empty boxes contribute nothing, so a
    /// gap shortens the code.
    pub fn code(&self) -> String {
        self.slots.iter().flatten().collect()
    }

    pub fn is_complete(&self) -> bool {
        self.code().len() == OTP_LENGTH
    }
}

fn check_slot(slot: usize) -> Result<(), CoreError> {
    if slot >= OTP_LENGTH {
        return Err(CoreError::Internal(format!(
            "OTP slot {slot} out of range (0..{OTP_LENGTH})"
        )));
    }
    Ok(())
}

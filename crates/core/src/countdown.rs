//! Resend countdown arithmetic.
//!
//! The countdown only mirrors the server's code expiry for display and
//! to gate the resend action; the server stays authoritative.

use crate::otp::OTP_VALIDITY_SECS;

/// Seconds left before a new code may be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    /// A countdown that has not been started yet. Resend stays blocked
    /// until the first code is dispatched, which starts it.
    pub fn new() -> Self {
        Self {
            remaining: OTP_VALIDITY_SECS,
        }
    }

    /// Reset to the full validity window.
    pub fn restart(&mut self) {
        self.remaining = OTP_VALIDITY_SECS;
    }

    /// Advance by one elapsed second. Returns `true` once the countdown
    /// has reached zero.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_expired()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// `m:ss`, e.g. `2:00`, `0:07`.
    pub fn display(&self) -> String {
        format!("{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

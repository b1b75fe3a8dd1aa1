//! Verified-submission wizard steps and transition rules.
//!
//! Every flow walks the same three steps: email entry, code entry, then
//! the entity form. Forward moves are driven by successful backend calls;
//! backward moves are explicit "Back" actions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    EmailEntry,
    OtpEntry,
    FormEntry,
}

/// Total number of steps in the wizard.
pub const TOTAL_STEPS: u8 = 3;

impl WizardStep {
    /// Convert to a 1-based step number.
    pub fn to_number(self) -> u8 {
        match self {
            Self::EmailEntry => 1,
            Self::OtpEntry => 2,
            Self::FormEntry => 3,
        }
    }

    /// Progress-indicator label.
    pub fn label(self) -> &'static str {
        match self {
            Self::EmailEntry => "Email Verification",
            Self::OtpEntry => "OTP Verification",
            Self::FormEntry => "Details",
        }
    }

    /// The step a "Back" action leads to, if any.
    pub fn previous(self) -> Option<Self> {
        match self {
            Self::EmailEntry => None,
            Self::OtpEntry => Some(Self::EmailEntry),
            Self::FormEntry => Some(Self::OtpEntry),
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::EmailEntry => Some(Self::OtpEntry),
            Self::OtpEntry => Some(Self::FormEntry),
            Self::FormEntry => None,
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Validate a step transition.
///
/// Valid transitions are exactly one step forward or one step backward.
/// Re-entering the OTP step from itself is also allowed: a resend keeps
/// the wizard where it is.
pub fn validate_step_transition(current: WizardStep, next: WizardStep) -> Result<(), CoreError> {
    if current == WizardStep::OtpEntry && next == WizardStep::OtpEntry {
        return Ok(());
    }

    if current.next() != Some(next) && current.previous() != Some(next) {
        return Err(CoreError::Conflict(format!(
            "Cannot move from '{current}' to '{next}'. Must advance or go back exactly one step."
        )));
    }
    Ok(())
}

/// Require the wizard to be on `expected` before running an operation.
pub fn require_step(current: WizardStep, expected: WizardStep) -> Result<(), CoreError> {
    if current != expected {
        return Err(CoreError::Conflict(format!(
            "Operation requires step '{expected}', wizard is on '{current}'"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

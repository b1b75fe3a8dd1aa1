use alumni_client::ApiError;
use alumni_core::error::CoreError;

/// Shown for every transport-level failure.
pub const MSG_NETWORK: &str = "Network error. Please try again.";

/// Fallbacks used when the backend rejects a request without a message.
pub const MSG_SEND_FAILED: &str = "Failed to send OTP";
pub const MSG_VERIFY_FAILED: &str = "Invalid OTP";
pub const MSG_ELIGIBILITY_FAILED: &str = "Failed to verify email";

/// Errors surfaced by wizard operations.
///
/// `Validation`, `Rejected` and `Network` are the user-facing categories;
/// their `Display` output is what a skin shows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a failure status.
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },

    /// The backend could not be reached or its answer could not be read.
    #[error("Network error. Please try again.")]
    Network(String),

    /// Another request of this wizard is still in flight.
    #[error("A request is already in progress")]
    Busy,

    #[error("{0}")]
    InvalidStep(String),

    /// The wizard was closed; the operation or its result was dropped.
    #[error("The wizard has been closed")]
    Closed,
}

impl WizardError {
    /// Map a client failure, using `fallback` when the backend rejected the
    /// request without saying why.
    pub fn from_api(err: ApiError, fallback: &str) -> Self {
        match err {
            ApiError::Rejected { status, error } => Self::Rejected {
                status: Some(status),
                message: error
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            },
            other => Self::Network(other.to_string()),
        }
    }

    /// Whether the failure should be recorded as the session's inline error.
    pub(crate) fn is_reportable(&self) -> bool {
        !matches!(self, Self::Busy | Self::Closed)
    }
}

impl From<CoreError> for WizardError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::Conflict(msg) => Self::InvalidStep(msg),
            CoreError::Internal(msg) => Self::Validation(msg),
        }
    }
}

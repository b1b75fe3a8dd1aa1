#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Input rejected locally, before anything reaches the backend.
    /// The message is user-facing and rendered verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a user-facing validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

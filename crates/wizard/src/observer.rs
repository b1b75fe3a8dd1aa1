//! Callbacks from a wizard to whatever is presenting it.

/// A message meant for a toast or alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success(String),
    Error(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }
}

/// Receives wizard events. All methods default to no-ops.
///
/// Callbacks run on the task that drove the operation and must not block.
pub trait WizardObserver: Send + Sync {
    fn notify(&self, _notification: Notification) {}

    /// The submission was persisted. Called before [`on_close`](Self::on_close).
    fn on_success(&self) {}

    /// The wizard closed, after a success or a cancel.
    fn on_close(&self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl WizardObserver for NullObserver {}

//! The verified-submission wizard: email, then a one-time code, then the
//! flow's form, submitted as a create or an update.
//!
//! One generic controller, [`Wizard`], serves every flow; the flow-specific
//! parts come from an [`alumni_core::entity::SubmissionEntity`]. All
//! backend traffic goes through an [`alumni_client::WizardBackend`].

pub mod controller;
pub mod error;
pub mod observer;
pub mod session;
mod timer;

pub use controller::Wizard;
pub use error::WizardError;
pub use observer::{Notification, NullObserver, WizardObserver};
pub use session::WizardSnapshot;

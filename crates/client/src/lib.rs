//! REST client for the alumni-connect backend.
//!
//! [`ConnectApi`] speaks the OTP, lookup and submission endpoints.
//! The wizard depends only on the [`WizardBackend`] trait, so tests and
//! alternative transports can stand in for the HTTP client.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;

pub use api::{ConnectApi, Country, Course, VerifyResponse};
pub use backend::WizardBackend;
pub use config::ClientConfig;
pub use error::ApiError;

//! Domain rules of the alumni verified-submission flows.
//!
//! Everything here is pure: step transitions, input validation, the OTP
//! entry model, countdown arithmetic, and the per-flow form schemas with
//! their create-or-update routing. I/O lives in `alumni-client` and the
//! session controller in `alumni-wizard`.

pub mod attachment;
pub mod countdown;
pub mod email;
pub mod entity;
pub mod error;
pub mod nomination;
pub mod otp;
pub mod registration;
pub mod sponsorship;
pub mod submission;
pub mod types;
pub mod wizard;

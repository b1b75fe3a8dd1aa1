//! Terminal front end for the alumni verified-submission wizards.

pub mod config;
pub mod fields;
pub mod prompt;
pub mod run;

//! The seam between the generic wizard and the three concrete flows.
//!
//! A [`SubmissionEntity`] describes everything flow-specific: the form
//! shape and its required fields, how a prior backend record maps onto the
//! form, where the record lives, and how it is found. The wizard itself
//! never names a concrete entity.

use std::fmt::Debug;

use chrono::Datelike;
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;
use crate::submission::SubmitRoute;
use crate::types::{OtpPurpose, RecordId};

/// How a flow discovers a prior record for the verified email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLookup {
    /// The OTP verify response carries the record.
    FromVerification,
    /// A separate lookup-by-email request after verification.
    ByEmail,
    /// Every submission is a new record.
    Never,
}

pub trait SubmissionEntity: Send + Sync + 'static {
    /// The user-editable working copy.
    type Form: Clone + Debug + Serialize + Validate + Send + Sync + 'static;

    /// A record as the backend returns it. Must tolerate absent keys.
    type Record: Clone + Debug + Default + DeserializeOwned + Send + Sync + 'static;

    /// Short name used in logs.
    const NAME: &'static str;

    const PURPOSE: OtpPurpose;

    /// Collection path segment, e.g. `alumni` for `POST /alumni`.
    const COLLECTION: &'static str;

    const LOOKUP: RecordLookup;

    /// Multipart field name of the optional file, for flows that take one.
    const ATTACHMENT_FIELD: Option<&'static str> = None;

    /// Whether the email must belong to a registered alumnus before a code
    /// is sent.
    const REQUIRES_REGISTERED_ALUMNI: bool = false;

    /// Shown when the backend rejects a submission without a message.
    const SUBMIT_FAILURE_FALLBACK: &'static str;

    /// A fresh form for a first-time submitter.
    fn blank_form(email: &str) -> Self::Form;

    /// Map a prior record onto a form.
    ///
    /// `base` is the current working copy; flows may fall back to it for
    /// caller-supplied defaults. Absent record values become blank.
    fn prefill(record: &Self::Record, email: &str, base: &Self::Form) -> Self::Form;

    fn record_id(record: &Self::Record) -> Option<RecordId>;

    /// Overwrite the form's email field with the verified address.
    fn bind_email(form: &mut Self::Form, email: &str);

    fn success_message(route: SubmitRoute) -> &'static str;

    /// Checks beyond required-field presence, run right before submitting.
    fn validate_before_submit(_form: &Self::Form) -> Result<(), CoreError> {
        Ok(())
    }

    /// Names of required fields that are still empty, sorted.
    ///
    /// Pure function of the form; the submit action is enabled exactly
    /// when this is empty.
    fn missing_fields(form: &Self::Form) -> Vec<String> {
        match form.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|k| k.to_string())
                    .collect();
                fields.sort();
                fields
            }
        }
    }

    /// Display labels of the missing required fields, in the same order
    /// as [`missing_fields`](Self::missing_fields).
    fn missing_labels(form: &Self::Form) -> Vec<String> {
        let Err(errors) = form.validate() else {
            return Vec::new();
        };
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        fields
            .into_iter()
            .map(|(key, errs)| {
                errs.iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| key.to_string())
            })
            .collect()
    }

    fn can_submit(form: &Self::Form) -> bool {
        Self::missing_fields(form).is_empty()
    }

    fn parse_record(value: serde_json::Value) -> Result<Self::Record, CoreError> {
        serde_json::from_value(value).map_err(|e| {
            CoreError::Internal(format!("Malformed {} record: {e}", Self::NAME))
        })
    }
}

/// The current calendar year, used as the graduation-year default of
/// blank forms.
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Treat zero as "not provided"; the backend stores absent numbers as 0.
pub(crate) fn nonzero_year(year: Option<i32>) -> Option<i32> {
    year.filter(|y| *y > 0)
}

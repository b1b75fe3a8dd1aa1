//! Alumni registration and profile update.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{current_year, nonzero_year, RecordLookup, SubmissionEntity};
use crate::submission::SubmitRoute;
use crate::types::{OtpPurpose, RecordId};

/// Country pre-selected on a blank registration form.
pub const DEFAULT_COUNTRY: &str = "Philippines";

/// Multipart field carrying the proof of payment.
pub const PAYMENT_PROOF_FIELD: &str = "payment_proof";

#[derive(Debug, Clone, Copy, Default)]
pub struct Registration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AlumniForm {
    #[validate(length(min = 1, message = "First name"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name"))]
    pub last_name: String,
    pub email: String,
    pub phone: String,
    /// Graduation year.
    #[validate(required(message = "Graduation year"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[validate(length(min = 1, message = "Course"))]
    pub course: String,
    pub company: String,
    pub position: String,
    #[validate(length(min = 1, message = "Country"))]
    pub country: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// An alumni row as returned by the backend.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct AlumniRecord {
    #[serde(rename = "ID")]
    pub id: Option<RecordId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub year: Option<i32>,
    pub course: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub paid: Option<bool>,
    /// File name of a previously uploaded proof of payment.
    pub payment_proof: Option<String>,
}

impl AlumniRecord {
    pub fn has_paid(&self) -> bool {
        self.paid.unwrap_or(false)
    }
}

impl SubmissionEntity for Registration {
    type Form = AlumniForm;
    type Record = AlumniRecord;

    const NAME: &'static str = "registration";
    const PURPOSE: OtpPurpose = OtpPurpose::Registration;
    const COLLECTION: &'static str = "alumni";
    const LOOKUP: RecordLookup = RecordLookup::FromVerification;
    const ATTACHMENT_FIELD: Option<&'static str> = Some(PAYMENT_PROOF_FIELD);
    const SUBMIT_FAILURE_FALLBACK: &'static str = "Failed to save registration";

    fn blank_form(email: &str) -> AlumniForm {
        AlumniForm {
            email: email.to_string(),
            year: Some(current_year()),
            country: DEFAULT_COUNTRY.to_string(),
            ..AlumniForm::default()
        }
    }

    fn prefill(record: &AlumniRecord, email: &str, _base: &AlumniForm) -> AlumniForm {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        AlumniForm {
            first_name: text(&record.first_name),
            last_name: text(&record.last_name),
            email: email.to_string(),
            phone: text(&record.phone),
            year: nonzero_year(record.year),
            course: text(&record.course),
            company: text(&record.company),
            position: text(&record.position),
            country: text(&record.country),
            city: text(&record.city),
            latitude: record.latitude.filter(|v| *v != 0.0),
            longitude: record.longitude.filter(|v| *v != 0.0),
        }
    }

    fn record_id(record: &AlumniRecord) -> Option<RecordId> {
        record.id.filter(|id| *id > 0)
    }

    fn bind_email(form: &mut AlumniForm, email: &str) {
        form.email = email.to_string();
    }

    fn success_message(route: SubmitRoute) -> &'static str {
        match route {
            SubmitRoute::Create => "Registration completed successfully!",
            SubmitRoute::Update(_) => "Profile updated successfully!",
        }
    }
}

//! Outstanding-alumni award nominations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::email::is_valid_email;
use crate::entity::{current_year, nonzero_year, RecordLookup, SubmissionEntity};
use crate::error::CoreError;
use crate::submission::SubmitRoute;
use crate::types::{OtpPurpose, RecordId};

/// Award categories a nomination can target.
pub const NOMINATION_CATEGORIES: [&str; 9] = [
    "Outstanding Alumni in Technology",
    "Outstanding Alumni in Business",
    "Outstanding Alumni in Education",
    "Outstanding Alumni in Public Service",
    "Outstanding Alumni in Healthcare",
    "Outstanding Alumni in Arts & Culture",
    "Outstanding Alumni in Social Impact",
    "Young Achiever Award",
    "Lifetime Achievement Award",
];

pub const MSG_NOT_REGISTERED: &str = "You must be a registered alumni to submit nominations. \
                                      Please register first before nominating.";

#[derive(Debug, Clone, Copy, Default)]
pub struct Nomination;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NominationForm {
    #[validate(length(min = 1, message = "Award category"))]
    pub category: String,
    /// Nominee first name.
    #[validate(length(min = 1, message = "Nominee first name"))]
    pub first_name: String,
    /// Nominee last name.
    #[validate(length(min = 1, message = "Nominee last name"))]
    pub last_name: String,
    /// Nominee email, optional.
    pub nominated_email: String,
    /// The verified submitter.
    pub nominator_email: String,
    /// Nominee graduation year.
    #[validate(required(message = "Graduation year"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NominationRecord {
    #[serde(rename = "ID")]
    pub id: Option<RecordId>,
    pub category: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nominated_email: Option<String>,
    pub nominator_email: Option<String>,
    pub year: Option<i32>,
}

impl SubmissionEntity for Nomination {
    type Form = NominationForm;
    type Record = NominationRecord;

    const NAME: &'static str = "nomination";
    const PURPOSE: OtpPurpose = OtpPurpose::Nomination;
    const COLLECTION: &'static str = "nominations";
    const LOOKUP: RecordLookup = RecordLookup::Never;
    const REQUIRES_REGISTERED_ALUMNI: bool = true;
    const SUBMIT_FAILURE_FALLBACK: &'static str = "Failed to submit nomination";

    fn blank_form(email: &str) -> NominationForm {
        NominationForm {
            nominator_email: email.to_string(),
            year: Some(current_year()),
            ..NominationForm::default()
        }
    }

    fn prefill(record: &NominationRecord, email: &str, _base: &NominationForm) -> NominationForm {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        NominationForm {
            category: text(&record.category),
            first_name: text(&record.first_name),
            last_name: text(&record.last_name),
            nominated_email: text(&record.nominated_email),
            nominator_email: email.to_string(),
            year: nonzero_year(record.year),
        }
    }

    fn record_id(record: &NominationRecord) -> Option<RecordId> {
        record.id.filter(|id| *id > 0)
    }

    fn bind_email(form: &mut NominationForm, email: &str) {
        form.nominator_email = email.to_string();
    }

    fn success_message(route: SubmitRoute) -> &'static str {
        match route {
            SubmitRoute::Create => "Nomination submitted successfully!",
            SubmitRoute::Update(_) => "Nomination updated successfully!",
        }
    }

    fn validate_before_submit(form: &NominationForm) -> Result<(), CoreError> {
        if !NOMINATION_CATEGORIES.contains(&form.category.as_str()) {
            return Err(CoreError::validation("Please select a valid award category"));
        }
        let nominee_email = form.nominated_email.trim();
        if !nominee_email.is_empty() && !is_valid_email(nominee_email) {
            return Err(CoreError::validation(
                "Please enter a valid email address for the nominee",
            ));
        }
        Ok(())
    }
}

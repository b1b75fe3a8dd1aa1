//! Event sponsorship applications.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entity::{RecordLookup, SubmissionEntity};
use crate::error::CoreError;
use crate::submission::SubmitRoute;
use crate::types::{OtpPurpose, RecordId};

pub const SPONSORSHIP_LEVELS: [&str; 7] = [
    "platinum",
    "gold",
    "silver",
    "bronze",
    "exhibitor package",
    "in-kind options",
    "equipment",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Sponsorship;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipForm {
    pub email: String,
    #[validate(length(min = 1, message = "Sponsorship level"))]
    pub level: String,
    pub requirement: String,
    #[validate(length(min = 1, message = "Last name"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "First name"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Company"))]
    pub company: String,
    #[validate(length(min = 1, message = "Address"))]
    pub address: String,
    #[validate(length(min = 1, message = "Contact number"))]
    pub contact_number: String,
}

impl SponsorshipForm {
    /// A blank form with the level chosen on the page that opened the
    /// wizard.
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct SponsorshipRecord {
    #[serde(rename = "ID")]
    pub id: Option<RecordId>,
    pub email: Option<String>,
    pub level: Option<String>,
    pub requirement: Option<String>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub company: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub confirmed: Option<bool>,
    pub feedback: Option<String>,
}

impl SubmissionEntity for Sponsorship {
    type Form = SponsorshipForm;
    type Record = SponsorshipRecord;

    const NAME: &'static str = "sponsorship";
    const PURPOSE: OtpPurpose = OtpPurpose::Sponsorship;
    const COLLECTION: &'static str = "sponsorships";
    const LOOKUP: RecordLookup = RecordLookup::ByEmail;
    const SUBMIT_FAILURE_FALLBACK: &'static str = "Failed to submit sponsorship application";

    fn blank_form(email: &str) -> SponsorshipForm {
        SponsorshipForm {
            email: email.to_string(),
            ..SponsorshipForm::default()
        }
    }

    /// A prior record without a level keeps the level pre-selected by the
    /// caller.
    fn prefill(record: &SponsorshipRecord, email: &str, base: &SponsorshipForm) -> SponsorshipForm {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let level = record
            .level
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| base.level.clone());
        SponsorshipForm {
            email: email.to_string(),
            level,
            requirement: text(&record.requirement),
            last_name: text(&record.last_name),
            first_name: text(&record.first_name),
            company: text(&record.company),
            address: text(&record.address),
            contact_number: text(&record.contact_number),
        }
    }

    fn record_id(record: &SponsorshipRecord) -> Option<RecordId> {
        record.id.filter(|id| *id > 0)
    }

    fn bind_email(form: &mut SponsorshipForm, email: &str) {
        form.email = email.to_string();
    }

    fn success_message(route: SubmitRoute) -> &'static str {
        match route {
            SubmitRoute::Create => "Sponsorship application submitted successfully!",
            SubmitRoute::Update(_) => "Sponsorship application updated successfully!",
        }
    }

    fn validate_before_submit(form: &SponsorshipForm) -> Result<(), CoreError> {
        if !SPONSORSHIP_LEVELS.contains(&form.level.as_str()) {
            return Err(CoreError::validation("Please select a valid sponsorship level"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_form_requires_every_contact_field() {
        let form = Sponsorship::blank_form("sponsor@corp.com");
        assert_eq!(
            Sponsorship::missing_fields(&form),
            vec![
                "address",
                "company",
                "contact_number",
                "first_name",
                "last_name",
                "level"
            ]
        );
    }

    #[test]
    fn requirement_is_optional() {
        let form = SponsorshipForm {
            email: "sponsor@corp.com".into(),
            level: "gold".into(),
            requirement: String::new(),
            last_name: "Cruz".into(),
            first_name: "Maria".into(),
            company: "Corp".into(),
            address: "Bacolod City".into(),
            contact_number: "0917".into(),
        };
        assert!(Sponsorship::can_submit(&form));
        assert!(Sponsorship::validate_before_submit(&form).is_ok());
    }

    #[test]
    fn unknown_level_is_rejected_at_submit() {
        let form = SponsorshipForm::with_level("diamond");
        assert!(Sponsorship::validate_before_submit(&form).is_err());
    }

    #[test]
    fn prefill_falls_back_to_preselected_level() {
        let record: SponsorshipRecord = serde_json::from_value(json!({
            "ID": 12,
            "FirstName": "Maria",
            "Company": "Corp"
        }))
        .unwrap();
        let base = SponsorshipForm::with_level("silver");

        let form = Sponsorship::prefill(&record, "sponsor@corp.com", &base);
        assert_eq!(form.level, "silver");
        assert_eq!(form.first_name, "Maria");
        assert_eq!(form.company, "Corp");
        assert_eq!(form.address, "");
        assert_eq!(form.email, "sponsor@corp.com");
        assert_eq!(Sponsorship::record_id(&record), Some(12));
    }

    #[test]
    fn prefill_prefers_recorded_level() {
        let record: SponsorshipRecord =
            serde_json::from_value(json!({ "ID": 1, "Level": "gold" })).unwrap();
        let form = Sponsorship::prefill(&record, "a@b.co", &SponsorshipForm::with_level("bronze"));
        assert_eq!(form.level, "gold");
    }

    #[test]
    fn form_serializes_camel_case() {
        let value = serde_json::to_value(SponsorshipForm::with_level("gold")).unwrap();
        assert_eq!(value["level"], "gold");
        assert!(value.get("contactNumber").is_some());
    }
}

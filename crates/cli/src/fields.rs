//! Per-flow field tables for terminal editing.
//!
//! Field keys match the names reported by
//! [`SubmissionEntity::missing_fields`], so a skin can flag the fields
//! that still block submission.

use alumni_core::entity::SubmissionEntity;
use alumni_core::nomination::{Nomination, NominationForm, NOMINATION_CATEGORIES};
use alumni_core::registration::{AlumniForm, Registration};
use alumni_core::sponsorship::{Sponsorship, SponsorshipForm, SPONSORSHIP_LEVELS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub key: &'static str,
    pub label: &'static str,
    /// Numbered choices; the answer may be the number or the text.
    pub choices: &'static [&'static str],
}

const fn text(key: &'static str, label: &'static str) -> Field {
    Field {
        key,
        label,
        choices: &[],
    }
}

/// A flow whose form can be edited one field at a time from text.
pub trait TerminalForm: SubmissionEntity {
    const FIELDS: &'static [Field];

    fn get(form: &Self::Form, key: &str) -> String;

    /// Apply the answer for `key`. The error is shown to the user.
    fn set(form: &mut Self::Form, key: &str, value: &str) -> Result<(), String>;
}

/// Resolve a numbered-choice answer. Free text is kept as typed.
pub fn pick_choice(field: &Field, value: &str) -> String {
    match value.parse::<usize>() {
        Ok(n) if (1..=field.choices.len()).contains(&n) => field.choices[n - 1].to_string(),
        _ => value.to_string(),
    }
}

fn parse_year(value: &str) -> Result<Option<i32>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i32>()
        .map(Some)
        .map_err(|_| format!("'{value}' is not a year"))
}

fn parse_coordinate(value: &str) -> Result<Option<f64>, String> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{value}' is not a number"))
}

fn show<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

impl TerminalForm for Registration {
    const FIELDS: &'static [Field] = &[
        text("first_name", "First name"),
        text("last_name", "Last name"),
        text("phone", "Phone"),
        text("year", "Graduation year"),
        text("course", "Course"),
        text("company", "Company"),
        text("position", "Position"),
        text("country", "Country"),
        text("city", "City"),
        text("latitude", "Latitude"),
        text("longitude", "Longitude"),
    ];

    fn get(form: &AlumniForm, key: &str) -> String {
        match key {
            "first_name" => form.first_name.clone(),
            "last_name" => form.last_name.clone(),
            "phone" => form.phone.clone(),
            "year" => show(&form.year),
            "course" => form.course.clone(),
            "company" => form.company.clone(),
            "position" => form.position.clone(),
            "country" => form.country.clone(),
            "city" => form.city.clone(),
            "latitude" => show(&form.latitude),
            "longitude" => show(&form.longitude),
            _ => String::new(),
        }
    }

    fn set(form: &mut AlumniForm, key: &str, value: &str) -> Result<(), String> {
        let value = value.to_string();
        match key {
            "first_name" => form.first_name = value,
            "last_name" => form.last_name = value,
            "phone" => form.phone = value,
            "year" => form.year = parse_year(&value)?,
            "course" => form.course = value,
            "company" => form.company = value,
            "position" => form.position = value,
            "country" => form.country = value,
            "city" => form.city = value,
            "latitude" => form.latitude = parse_coordinate(&value)?,
            "longitude" => form.longitude = parse_coordinate(&value)?,
            other => return Err(format!("Unknown field '{other}'")),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Nomination
// ---------------------------------------------------------------------------

impl TerminalForm for Nomination {
    const FIELDS: &'static [Field] = &[
        Field {
            key: "category",
            label: "Award category",
            choices: &NOMINATION_CATEGORIES,
        },
        text("first_name", "Nominee first name"),
        text("last_name", "Nominee last name"),
        text("nominated_email", "Nominee email"),
        text("year", "Nominee graduation year"),
    ];

    fn get(form: &NominationForm, key: &str) -> String {
        match key {
            "category" => form.category.clone(),
            "first_name" => form.first_name.clone(),
            "last_name" => form.last_name.clone(),
            "nominated_email" => form.nominated_email.clone(),
            "year" => show(&form.year),
            _ => String::new(),
        }
    }

    fn set(form: &mut NominationForm, key: &str, value: &str) -> Result<(), String> {
        let value = value.to_string();
        match key {
            "category" => form.category = value,
            "first_name" => form.first_name = value,
            "last_name" => form.last_name = value,
            "nominated_email" => form.nominated_email = value,
            "year" => form.year = parse_year(&value)?,
            other => return Err(format!("Unknown field '{other}'")),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sponsorship
// ---------------------------------------------------------------------------

impl TerminalForm for Sponsorship {
    const FIELDS: &'static [Field] = &[
        Field {
            key: "level",
            label: "Sponsorship level",
            choices: &SPONSORSHIP_LEVELS,
        },
        text("first_name", "First name"),
        text("last_name", "Last name"),
        text("company", "Company"),
        text("address", "Address"),
        text("contact_number", "Contact number"),
        text("requirement", "Requirements or notes"),
    ];

    fn get(form: &SponsorshipForm, key: &str) -> String {
        match key {
            "level" => form.level.clone(),
            "first_name" => form.first_name.clone(),
            "last_name" => form.last_name.clone(),
            "company" => form.company.clone(),
            "address" => form.address.clone(),
            "contact_number" => form.contact_number.clone(),
            "requirement" => form.requirement.clone(),
            _ => String::new(),
        }
    }

    fn set(form: &mut SponsorshipForm, key: &str, value: &str) -> Result<(), String> {
        let value = value.to_string();
        match key {
            "level" => form.level = value,
            "first_name" => form.first_name = value,
            "last_name" => form.last_name = value,
            "company" => form.company = value,
            "address" => form.address = value,
            "contact_number" => form.contact_number = value,
            "requirement" => form.requirement = value,
            other => return Err(format!("Unknown field '{other}'")),
        }
        Ok(())
    }
}

//! Create-or-update routing and request shaping.
//!
//! The wizard keeps exactly one authoritative identifier for a prior
//! record (learned during verification). [`SubmitRoute::from_existing`]
//! turns it into a create or an update; [`build_request`] then produces an
//! encoding-neutral request that the HTTP client turns into JSON or
//! multipart.

use crate::attachment::{validate_attachment, Attachment};
use crate::entity::SubmissionEntity;
use crate::error::CoreError;
use crate::types::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRoute {
    Create,
    Update(RecordId),
}

impl SubmitRoute {
    pub fn from_existing(existing_id: Option<RecordId>) -> Self {
        match existing_id {
            Some(id) => Self::Update(id),
            None => Self::Create,
        }
    }

    pub fn is_update(&self) -> bool {
        matches!(self, Self::Update(_))
    }

    /// Path relative to the API base, e.g. `/alumni` or `/alumni/7`.
    pub fn path(&self, collection: &str) -> String {
        match self {
            Self::Create => format!("/{collection}"),
            Self::Update(id) => format!("/{collection}/{id}"),
        }
    }
}

/// Wire shape of a submission body.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionBody {
    /// Fields only.
    Json(serde_json::Value),
    /// Every scalar field as a text part plus one file part.
    Multipart {
        fields: Vec<(String, String)>,
        file_field: &'static str,
        file: Attachment,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub collection: &'static str,
    pub route: SubmitRoute,
    pub body: SubmissionBody,
}

impl SubmissionRequest {
    pub fn path(&self) -> String {
        self.route.path(self.collection)
    }
}

/// Build the request for submitting `form`.
///
/// Fails locally when a required field is empty, when entity-specific
/// checks fail, or when the attachment breaks its constraints.
pub fn build_request<E: SubmissionEntity>(
    form: &E::Form,
    existing_id: Option<RecordId>,
    attachment: Option<&Attachment>,
) -> Result<SubmissionRequest, CoreError> {
    let missing = E::missing_labels(form);
    if !missing.is_empty() {
        return Err(CoreError::validation(format!(
            "Please fill in all required fields: {}",
            missing.join(", ")
        )));
    }
    E::validate_before_submit(form)?;

    let body = match attachment {
        None => SubmissionBody::Json(to_json(form)?),
        Some(file) => {
            let file_field = E::ATTACHMENT_FIELD.ok_or_else(|| {
                CoreError::Internal(format!("{} submissions do not take a file", E::NAME))
            })?;
            validate_attachment(file)?;
            SubmissionBody::Multipart {
                fields: multipart_fields(&to_json(form)?),
                file_field,
                file: file.clone(),
            }
        }
    };

    Ok(SubmissionRequest {
        collection: E::COLLECTION,
        route: SubmitRoute::from_existing(existing_id),
        body,
    })
}

fn to_json<T: serde::Serialize>(form: &T) -> Result<serde_json::Value, CoreError> {
    serde_json::to_value(form).map_err(|e| CoreError::Internal(format!("Form encoding failed: {e}")))
}

/// Flatten a JSON object into text parts, using the same field names as
/// the JSON encoding. Nulls are omitted.
fn multipart_fields(value: &serde_json::Value) -> Vec<(String, String)> {
    let Some(obj) = value.as_object() else {
        return Vec::new();
    };
    obj.iter()
        .filter_map(|(key, v)| {
            let text = match v {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), text))
        })
        .collect()
}

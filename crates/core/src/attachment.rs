//! Proof-of-payment attachment constraints.

use crate::error::CoreError;

/// The only accepted document type.
pub const ACCEPTED_MIME_TYPE: &str = "application/pdf";

/// Maximum attachment size: 5 MiB.
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

pub const MSG_ATTACHMENT_TYPE: &str = "Only PDF files are allowed for payment proof";
pub const MSG_ATTACHMENT_SIZE: &str = "File size must be less than 5MB";

/// A file picked by the user, held in memory until submission.
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Check type and size. The type check comes first, matching what the
/// user is told first when both are wrong.
pub fn validate_attachment(attachment: &Attachment) -> Result<(), CoreError> {
    if attachment.mime_type != ACCEPTED_MIME_TYPE {
        return Err(CoreError::validation(MSG_ATTACHMENT_TYPE));
    }
    if attachment.size() > MAX_ATTACHMENT_BYTES {
        return Err(CoreError::validation(MSG_ATTACHMENT_SIZE));
    }
    Ok(())
}

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Backend record identifiers are numeric serial keys.
pub type RecordId = i64;

/// Tags an OTP request so the same email can hold independent codes for
/// each flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    Registration,
    Nomination,
    Sponsorship,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registration => "registration",
            Self::Nomination => "nomination",
            Self::Sponsorship => "sponsorship",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "registration" => Ok(Self::Registration),
            "nomination" => Ok(Self::Nomination),
            "sponsorship" => Ok(Self::Sponsorship),
            _ => Err(CoreError::validation(format!(
                "Invalid purpose '{s}'. Must be one of: registration, nomination, sponsorship"
            ))),
        }
    }
}

impl std::fmt::Display for OtpPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purpose_parse_roundtrip() {
        for purpose in [
            OtpPurpose::Registration,
            OtpPurpose::Nomination,
            OtpPurpose::Sponsorship,
        ] {
            assert_eq!(OtpPurpose::parse(purpose.as_str()).unwrap(), purpose);
        }
    }

    #[test]
    fn purpose_parse_rejects_unknown() {
        assert!(OtpPurpose::parse("").is_err());
        assert!(OtpPurpose::parse("Registration").is_err());
    }

    #[test]
    fn purpose_serializes_lowercase() {
        let json = serde_json::to_string(&OtpPurpose::Sponsorship).unwrap();
        assert_eq!(json, "\"sponsorship\"");
    }
}

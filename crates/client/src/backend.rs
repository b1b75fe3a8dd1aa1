use async_trait::async_trait;

use alumni_core::submission::SubmissionRequest;
use alumni_core::types::OtpPurpose;

use crate::api::{ConnectApi, VerifyResponse};
use crate::error::ApiError;

/// Everything the verified-submission wizard needs from the backend.
#[async_trait]
pub trait WizardBackend: Send + Sync {
    async fn send_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), ApiError>;

    async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<VerifyResponse, ApiError>;

    async fn is_registered_alumni(&self, email: &str) -> Result<bool, ApiError>;

    /// `Ok(None)` when `email` owns no record in `collection`.
    async fn find_by_email(
        &self,
        collection: &str,
        email: &str,
    ) -> Result<Option<serde_json::Value>, ApiError>;

    async fn submit(&self, request: &SubmissionRequest) -> Result<serde_json::Value, ApiError>;
}

#[async_trait]
impl WizardBackend for ConnectApi {
    async fn send_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), ApiError> {
        ConnectApi::send_otp(self, email, purpose).await
    }

    async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<VerifyResponse, ApiError> {
        ConnectApi::verify_otp(self, email, code, purpose).await
    }

    async fn is_registered_alumni(&self, email: &str) -> Result<bool, ApiError> {
        ConnectApi::is_registered_alumni(self, email).await
    }

    async fn find_by_email(
        &self,
        collection: &str,
        email: &str,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        ConnectApi::find_by_email(self, collection, email).await
    }

    async fn submit(&self, request: &SubmissionRequest) -> Result<serde_json::Value, ApiError> {
        ConnectApi::submit(self, request).await
    }
}

//! HTTP client for the alumni-connect REST endpoints.
//!
//! Wraps OTP dispatch and verification, record lookups, create/update
//! submissions (JSON or multipart) and the registration reference lists,
//! using [`reqwest`].

use alumni_core::submission::{SubmissionBody, SubmissionRequest, SubmitRoute};
use alumni_core::types::OtpPurpose;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ApiError;

/// HTTP client for one backend instance.
#[derive(Debug, Clone)]
pub struct ConnectApi {
    client: reqwest::Client,
    api_url: String,
}

#[derive(Debug, Serialize)]
struct SendOtpBody<'a> {
    email: &'a str,
    purpose: OtpPurpose,
}

#[derive(Debug, Serialize)]
struct VerifyOtpBody<'a> {
    email: &'a str,
    code: &'a str,
    purpose: OtpPurpose,
}

/// Response of `POST /otp/verify`.
///
/// The registration flow answers with `alumni_exists` / `alumni_data`;
/// both spellings decode into the same fields.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VerifyResponse {
    #[serde(alias = "alumni_exists")]
    pub exists: bool,
    #[serde(alias = "alumni_data")]
    pub record: Option<serde_json::Value>,
}

impl VerifyResponse {
    /// The prior record, only when the backend both flagged it and sent it.
    pub fn existing_record(self) -> Option<serde_json::Value> {
        if self.exists {
            self.record.filter(|r| !r.is_null())
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    #[serde(default)]
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// A country choice for the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Country {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    pub code: String,
}

/// A degree program choice for the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Course {
    #[serde(rename = "ID")]
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl ConnectApi {
    /// Create a new API client for the base URL in `config`.
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Ask the backend to email a fresh code for `(email, purpose)`.
    ///
    /// Sends `POST /otp/send`.
    pub async fn send_otp(&self, email: &str, purpose: OtpPurpose) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/otp/send"))
            .json(&SendOtpBody { email, purpose })
            .send()
            .await?;

        Self::check_status(response).await?;
        tracing::debug!(email, %purpose, "OTP dispatch accepted");
        Ok(())
    }

    /// Check a code for `(email, purpose)`.
    ///
    /// Sends `POST /otp/verify`. A wrong or expired code comes back as
    /// [`ApiError::Rejected`] carrying the server's message.
    pub async fn verify_otp(
        &self,
        email: &str,
        code: &str,
        purpose: OtpPurpose,
    ) -> Result<VerifyResponse, ApiError> {
        let response = self
            .client
            .post(self.url("/otp/verify"))
            .json(&VerifyOtpBody {
                email,
                code,
                purpose,
            })
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Whether `email` belongs to a registered alumnus.
    ///
    /// Sends `GET /check-alumni-email?email=...`.
    pub async fn is_registered_alumni(&self, email: &str) -> Result<bool, ApiError> {
        let response = self
            .client
            .get(self.url("/check-alumni-email"))
            .query(&[("email", email)])
            .send()
            .await?;

        let body: ExistsResponse = Self::parse_response(response).await?;
        Ok(body.exists)
    }

    /// Fetch the record of `collection` owned by `email`.
    ///
    /// Sends `GET /{collection}/email/{email}`; a 404 means there is none.
    pub async fn find_by_email(
        &self,
        collection: &str,
        email: &str,
    ) -> Result<Option<serde_json::Value>, ApiError> {
        let mut url = reqwest::Url::parse(&self.url(&format!("/{collection}/email/")))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .push(email);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::parse_response(response).await.map(Some)
    }

    /// Create or update a record.
    ///
    /// `POST /{collection}` or `PUT /{collection}/{id}`, with a JSON body
    /// or a multipart body when a file is attached.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<serde_json::Value, ApiError> {
        let url = self.url(&request.path());
        let builder = match request.route {
            SubmitRoute::Create => self.client.post(url),
            SubmitRoute::Update(_) => self.client.put(url),
        };

        let builder = match &request.body {
            SubmissionBody::Json(value) => builder.json(value),
            SubmissionBody::Multipart {
                fields,
                file_field,
                file,
            } => {
                let mut form = Form::new();
                for (name, value) in fields {
                    form = form.text(name.clone(), value.clone());
                }
                let part = Part::bytes(file.bytes.clone())
                    .file_name(file.file_name.clone())
                    .mime_str(&file.mime_type)?;
                builder.multipart(form.part(*file_field, part))
            }
        };

        let response = builder.send().await?;
        let value = Self::parse_response(response).await?;
        tracing::info!(
            collection = request.collection,
            update = request.route.is_update(),
            "Submission accepted"
        );
        Ok(value)
    }

    /// `GET /countries`.
    pub async fn list_countries(&self) -> Result<Vec<Country>, ApiError> {
        let response = self.client.get(self.url("/countries")).send().await?;
        Self::parse_response(response).await
    }

    /// `GET /courses`.
    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let response = self.client.get(self.url("/courses")).send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Rejected`] carrying
    /// the status and the body's `error` message on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|e| !e.is_empty());
        tracing::debug!(status = status.as_u16(), ?error, "Backend rejected request");
        Err(ApiError::Rejected {
            status: status.as_u16(),
            error,
        })
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

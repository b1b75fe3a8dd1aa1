/// Errors from the backend REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, undecodable
    /// body, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A request URL could not be built from the configured base.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The backend answered with a non-2xx status.
    #[error("API error ({status}): {}", .error.as_deref().unwrap_or("<no message>"))]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the JSON body, when present.
        error: Option<String>,
    },
}

impl ApiError {
    /// Whether the failure happened below the API contract, i.e. the
    /// backend never gave an answer the client could read.
    pub fn is_transport(&self) -> bool {
        !matches!(self, Self::Rejected { .. })
    }

    /// The backend's own message, to be shown verbatim.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { error, .. } => error.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::InvalidUrl(_) => None,
        }
    }
}

/// Default API base URL for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash, e.g. `http://host:8080/api`.
    pub api_url: String,
}

impl ClientConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                      |
    /// |-------------------|------------------------------|
    /// | `CONNECT_API_URL` | `http://localhost:8080/api`  |
    ///
    /// No request timeout is configured here; the transport's defaults
    /// apply.
    pub fn from_env() -> Self {
        let api_url = std::env::var("CONNECT_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self::new(api_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

//! Configuration for the `/Usuarios` HTTP client.

/// Base URL the original deployment serves the API on.
pub const DEFAULT_BASE_URL: &str = "https://localhost:7102/api";

/// Configuration for the `/Usuarios` HTTP client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub base_url: String,
    /// Request timeout in milliseconds. This is the transport default; no
    /// per-operation timeout exists above it.
    pub request_timeout_ms: u64,
    /// Accept self-signed certificates. The development backend serves
    /// https on localhost with one.
    pub accept_invalid_certs: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_ms: 30000,
            accept_invalid_certs: false,
        }
    }
}

impl ClientConfig {
    /// Default configuration with the base URL taken from the
    /// `GESTION_API_URL` environment variable when set.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("GESTION_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        ClientConfig {
            base_url,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }
}

//! The reqwest-backed `/Usuarios` client.

use crate::client::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::token::TokenCell;
use crate::traits::UsuariosApi;
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use serde::Serialize;
use usuarios_common::{Credentials, LoginResponse, NewUser, User, UserPatch};

/// HTTP client for the `/Usuarios` backend.
///
/// Cheap to clone; clones share the connection pool and the token cell.
#[derive(Clone, Debug)]
pub struct UsuariosClient {
    http: reqwest::Client,
    base_url: String,
    token: TokenCell,
}

impl UsuariosClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_token_cell(config, TokenCell::new())
    }

    /// Build a client sharing an externally owned token cell.
    pub fn with_token_cell(config: ClientConfig, token: TokenCell) -> Result<Self> {
        let base = url::Url::parse(&config.base_url).map_err(|e| {
            ApiError::Config(format!("invalid base URL {:?}: {}", config.base_url, e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        Ok(UsuariosClient {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Handle to the shared token cell.
    pub fn token_cell(&self) -> TokenCell {
        self.token.clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach `Authorization: Bearer` when a token is held. The cell is
    /// read freshly per request, never cached on the builder.
    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token.get() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            serde_json::from_slice(&body).map_err(ApiError::Decode)
        } else {
            Err(ApiError::from_status_body(status.as_u16(), &body))
        }
    }

    /// Like `execute` but discards the body: update/delete answers vary
    /// between an echoed record and a bare acknowledgement.
    async fn execute_discard(&self, builder: RequestBuilder) -> Result<()> {
        let response = self.authorize(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await?;
        Err(ApiError::from_status_body(status.as_u16(), &body))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("[Usuarios] GET {}", url);
        self.execute(self.http.get(&url)).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.endpoint(path);
        tracing::debug!("[Usuarios] POST {}", url);
        self.execute(self.http.post(&url).json(body)).await
    }
}

#[async_trait]
impl UsuariosApi for UsuariosClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.post_json("Usuarios/login", credentials).await
    }

    async fn get_all(&self) -> Result<Vec<User>> {
        self.get_json("Usuarios").await
    }

    async fn get_by_id(&self, id: i64) -> Result<User> {
        self.get_json(&format!("Usuarios/{}", id)).await
    }

    async fn create(&self, user: &NewUser) -> Result<User> {
        self.post_json("Usuarios", user).await
    }

    async fn update(&self, id: i64, patch: &UserPatch) -> Result<()> {
        let url = self.endpoint(&format!("Usuarios/{}", id));
        tracing::debug!("[Usuarios] PUT {}", url);
        self.execute_discard(self.http.put(&url).json(patch)).await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let url = self.endpoint(&format!("Usuarios/{}", id));
        tracing::debug!("[Usuarios] DELETE {}", url);
        self.execute_discard(self.http.delete(&url)).await
    }
}

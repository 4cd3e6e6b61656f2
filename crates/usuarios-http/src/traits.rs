//! Abstraction over the `/Usuarios` backend operations.

use crate::error::Result;
use async_trait::async_trait;
use usuarios_common::{Credentials, LoginResponse, NewUser, User, UserPatch};

/// The six backend operations the stores depend on.
///
/// Implemented by [`crate::UsuariosClient`] over HTTP; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait UsuariosApi: Send + Sync {
    /// `POST /Usuarios/login`
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    /// `GET /Usuarios`
    async fn get_all(&self) -> Result<Vec<User>>;

    /// `GET /Usuarios/{id}`
    async fn get_by_id(&self, id: i64) -> Result<User>;

    /// `POST /Usuarios`
    async fn create(&self, user: &NewUser) -> Result<User>;

    /// `PUT /Usuarios/{id}`. The backend may answer with the updated record
    /// or a bare acknowledgement, so the echo is discarded either way.
    async fn update(&self, id: i64, patch: &UserPatch) -> Result<()>;

    /// `DELETE /Usuarios/{id}`
    async fn delete(&self, id: i64) -> Result<()>;
}

//! HTTP client for the `/Usuarios` user-management backend.
//!
//! The client speaks plain JSON REST and attaches `Authorization: Bearer`
//! from a shared [`TokenCell`] that the session layer fills after login.
//! Consumers that need a substitutable backend (stores, tests) depend on
//! the [`UsuariosApi`] trait instead of the concrete client.

pub mod client;
pub mod error;
pub mod token;
pub mod traits;

pub use client::{ClientConfig, UsuariosClient};
pub use error::{ApiError, Result};
pub use token::TokenCell;
pub use traits::UsuariosApi;

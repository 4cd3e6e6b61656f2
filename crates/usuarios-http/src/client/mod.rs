//! HTTP client implementation for the `/Usuarios` API.

mod config;
mod fetch;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use fetch::UsuariosClient;

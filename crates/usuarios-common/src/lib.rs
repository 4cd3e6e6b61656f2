//! Shared layer for the Gestión de Usuarios client
//!
//! Holds the wire models for the `/Usuarios` backend plus the resolution of
//! the local data directory where the session file lives:
//! ```text
//! gestion_data/            # or $GESTION_ROOT, or <platform data dir>/gestion
//! └── session.json         # persisted session (token + user blob)
//! ```

pub mod models;

pub use models::{
    ClassifiedUser, Credentials, ErrorBody, LoginResponse, NewUser, ScoreColor, SessionUser, User,
    UserPatch, score_color,
};

use std::path::PathBuf;
use tracing::info;

/// Get the data root from environment, platform data dir, or default
pub fn data_root() -> PathBuf {
    // 1. Check environment variable
    if let Ok(val) = std::env::var("GESTION_ROOT") {
        return PathBuf::from(val);
    }

    // 2. Platform data directory
    if let Some(dir) = dirs::data_dir() {
        return dir.join("gestion");
    }

    // 3. Default fallback
    PathBuf::from("gestion_data")
}

/// Persisted session file path
pub fn session_file() -> PathBuf {
    data_root().join("session.json")
}

/// Ensure a single directory exists
pub fn ensure_dir(path: &PathBuf) -> anyhow::Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created directory: {:?}", path);
    }
    Ok(())
}

/// Ensure a file's parent directory exists
pub fn ensure_parent(path: &PathBuf) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(&parent.to_path_buf())?;
    }
    Ok(())
}

//! Application wiring: one set of stores per process, shared by reference.

use std::path::PathBuf;
use std::sync::Arc;

use usuarios_http::{ClientConfig, TokenCell, UsuariosApi, UsuariosClient};

use crate::routing::{Route, Router};
use crate::session::SessionStore;
use crate::storage::{FileStorage, KeyStorage};
use crate::users::UserStore;

/// Configuration for the Gestión de Usuarios client
#[derive(Clone, Debug)]
pub struct GestionConfig {
    /// Backend client settings (base URL, timeout, TLS)
    pub client: ClientConfig,
    /// Path of the durable session file
    pub storage_path: PathBuf,
}

impl Default for GestionConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            storage_path: usuarios_common::session_file(),
        }
    }
}

impl GestionConfig {
    /// Config from the environment: `GESTION_API_URL` for the backend,
    /// `GESTION_ROOT` for where the session file lives.
    pub fn from_env() -> Self {
        Self {
            client: ClientConfig::from_env(),
            storage_path: usuarios_common::session_file(),
        }
    }
}

/// The stores shared across the process.
#[derive(Clone)]
pub struct App {
    pub session: Arc<SessionStore>,
    pub users: Arc<UserStore>,
    pub router: Arc<Router>,
}

impl App {
    /// Build the real wiring: HTTP client and file-backed session storage.
    pub fn new(config: GestionConfig) -> anyhow::Result<Self> {
        let token_cell = TokenCell::new();
        let client = UsuariosClient::with_token_cell(config.client, token_cell.clone())?;
        let storage = Arc::new(FileStorage::open(config.storage_path));
        Ok(Self::with_parts(Arc::new(client), storage, token_cell))
    }

    /// Wire the stores over explicit collaborators. Tests use this with
    /// fakes; `new` uses it with the real client and file storage.
    pub fn with_parts(
        api: Arc<dyn UsuariosApi>,
        storage: Arc<dyn KeyStorage>,
        token_cell: TokenCell,
    ) -> Self {
        let session = Arc::new(SessionStore::new(api.clone(), storage, token_cell));
        let users = Arc::new(UserStore::new(api));
        let router = Arc::new(Router::new(session.clone()));
        Self {
            session,
            users,
            router,
        }
    }

    /// Process start: rehydrate the persisted session, then run the
    /// startup navigation check.
    pub fn start(&self) -> Route {
        self.session.rehydrate();
        self.router.initial_route()
    }
}

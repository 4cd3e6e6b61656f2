//! Session store: login, logout, and rehydration of the persisted session.
//!
//! Owns the in-memory identity and keeps the shared token cell in step with
//! durable storage. Navigation is not performed here; the store emits
//! [`SessionEvent`]s and the presentation layer decides where to go.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use usuarios_common::{Credentials, SessionUser};
use usuarios_http::{TokenCell, UsuariosApi};

use crate::state::{OpState, OperationState};
use crate::storage::{KeyStorage, TOKEN_KEY, USER_KEY};

/// Fallback shown when the backend gives no message for a failed login.
const LOGIN_ERROR: &str = "Error al iniciar sesión";

/// Outcome emitted after a session change; consumers subscribe and react
/// (e.g. navigate to the landing or login route).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
}

pub struct SessionStore {
    api: Arc<dyn UsuariosApi>,
    storage: Arc<dyn KeyStorage>,
    token_cell: TokenCell,
    user: RwLock<Option<SessionUser>>,
    op: OpState,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionStore {
    pub fn new(
        api: Arc<dyn UsuariosApi>,
        storage: Arc<dyn KeyStorage>,
        token_cell: TokenCell,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            api,
            storage,
            token_cell,
            user: RwLock::new(None),
            op: OpState::new(),
            events,
        }
    }

    /// Restore the session persisted by a previous run. Both durable keys
    /// must be present and the user blob must parse; anything less is "no
    /// session" (the keys are left untouched, never a crash).
    pub fn rehydrate(&self) -> bool {
        let token = match self.storage.get(TOKEN_KEY) {
            Some(token) => token,
            None => return false,
        };
        let blob = match self.storage.get(USER_KEY) {
            Some(blob) => blob,
            None => {
                warn!("[Auth] stored token without user blob, ignoring session");
                return false;
            }
        };
        let user: SessionUser = match serde_json::from_str(&blob) {
            Ok(user) => user,
            Err(err) => {
                warn!("[Auth] corrupt user blob, ignoring session: {}", err);
                return false;
            }
        };

        info!("[Auth] session restored for {}", user.display_name());
        self.token_cell.set(Some(token));
        *self.user.write() = Some(user);
        true
    }

    /// Authenticate against the backend. On success the session is set in
    /// memory, persisted under both durable keys, and `LoggedIn` is emitted.
    /// On failure the error message is recorded and state is left unchanged.
    pub async fn login(&self, credentials: Credentials) -> bool {
        self.op.begin();
        match self.api.login(&credentials).await {
            Ok(response) => {
                let user = response.session_user();
                self.token_cell.set(Some(response.token.clone()));
                self.storage.set(TOKEN_KEY, &response.token);
                match serde_json::to_string(&user) {
                    Ok(blob) => self.storage.set(USER_KEY, &blob),
                    Err(err) => error!("[Auth] failed to encode user blob: {}", err),
                }
                info!("[Auth] login ok for {}", user.display_name());
                *self.user.write() = Some(user);
                self.op.succeed();
                let _ = self.events.send(SessionEvent::LoggedIn);
                true
            }
            Err(err) => {
                error!("[Auth] login failed: {}", err);
                let message = err.backend_message().unwrap_or(LOGIN_ERROR);
                self.op.fail(message);
                false
            }
        }
    }

    /// Drop the session: in-memory state, shared token, and both durable
    /// keys. No network call; cannot fail. Emits `LoggedOut`.
    pub fn logout(&self) {
        self.token_cell.set(None);
        *self.user.write() = None;
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        self.op.reset();
        info!("[Auth] logged out");
        let _ = self.events.send(SessionEvent::LoggedOut);
    }

    /// Token presence, read fresh from the shared cell.
    pub fn is_authenticated(&self) -> bool {
        self.token_cell.is_set()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.user.read().clone()
    }

    pub fn token_cell(&self) -> &TokenCell {
        &self.token_cell
    }

    pub fn state(&self) -> OperationState {
        self.op.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

//! Gestión de Usuarios front-end core.
//!
//! The stores behind the user-management client: session (login/logout,
//! persisted token), user collection (cached CRUD with server
//! reconciliation), and the route guard that gates navigation on the
//! session. Views sit on top of these; the backend is reached through
//! the `usuarios-http` client.

pub mod app;
pub mod routing;
pub mod session;
pub mod state;
pub mod storage;
pub mod users;

// Re-export commonly used types
pub use app::{App, GestionConfig};
pub use routing::{guard, GuardDecision, Route, Router};
pub use session::{SessionEvent, SessionStore};
pub use state::OperationState;
pub use storage::{FileStorage, KeyStorage, MemoryStorage, TOKEN_KEY, USER_KEY};
pub use users::UserStore;

pub use usuarios_common::{
    score_color, ClassifiedUser, Credentials, NewUser, ScoreColor, SessionUser, User, UserPatch,
};
pub use usuarios_http::{ApiError, ClientConfig, TokenCell, UsuariosApi, UsuariosClient};

//! Route table and navigation guard.
//!
//! Routes are a closed set; the guard gates them on token presence, read
//! fresh from the session store at every navigation.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::RwLock;
use tracing::info;

use crate::session::SessionStore;

/// The navigable routes. The root path is a table-level redirect to login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Users,
    UserNew,
    UserEdit(i64),
}

impl Route {
    /// Parse a path into a route. Unknown paths (including a non-numeric
    /// edit id) are rejected.
    pub fn parse(path: &str) -> Option<Route> {
        match path {
            "/" | "/login" => Some(Route::Login),
            "/users" => Some(Route::Users),
            "/users/new" => Some(Route::UserNew),
            _ => path
                .strip_prefix("/users/")
                .and_then(|rest| rest.strip_suffix("/edit"))
                .and_then(|id| id.parse().ok())
                .map(Route::UserEdit),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Users => "/users".to_string(),
            Route::UserNew => "/users/new".to_string(),
            Route::UserEdit(id) => format!("/users/{}/edit", id),
        }
    }

    /// Everything except the login route needs a session.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}

/// Evaluate the guard rules for a navigation attempt, in order: a protected
/// target without a token goes to login; the login page with a token goes
/// to the landing page; everything else passes unchanged.
pub fn guard(target: Route, authenticated: bool) -> GuardDecision {
    if target.requires_auth() && !authenticated {
        return GuardDecision::Redirect(Route::Login);
    }
    if target == Route::Login && authenticated {
        return GuardDecision::Redirect(Route::Users);
    }
    GuardDecision::Allow
}

/// Tracks the current route and runs every navigation through the guard.
pub struct Router {
    session: Arc<SessionStore>,
    current: RwLock<Route>,
}

impl Router {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            current: RwLock::new(Route::Login),
        }
    }

    /// Navigate to a path. Unknown paths are an error; known ones resolve
    /// through the guard to the route actually landed on.
    pub fn navigate(&self, path: &str) -> Result<Route> {
        let route = Route::parse(path)
            .ok_or_else(|| anyhow::anyhow!("unknown path: {}", path))?;
        Ok(self.apply(route))
    }

    /// The one-shot startup check: resolve the root path against the
    /// current session before anything renders.
    pub fn initial_route(&self) -> Route {
        self.apply(Route::Login)
    }

    pub fn current(&self) -> Route {
        *self.current.read()
    }

    fn apply(&self, route: Route) -> Route {
        // Token presence is read fresh on every navigation.
        let target = match guard(route, self.session.is_authenticated()) {
            GuardDecision::Allow => route,
            GuardDecision::Redirect(to) => {
                info!("[Router] {} redirected to {}", route, to);
                to
            }
        };
        *self.current.write() = target;
        target
    }
}

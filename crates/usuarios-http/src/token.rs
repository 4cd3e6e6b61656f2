//! Shared bearer-token cell.

use parking_lot::RwLock;
use std::sync::Arc;

/// Cell holding the current bearer token.
///
/// The session layer writes it at login/logout; the client reads it freshly
/// on every outgoing request, so a token change in one part of the app is
/// visible to the next request without rebuilding the client. Reads and
/// writes are synchronous and never held across an await point.
#[derive(Clone, Debug, Default)]
pub struct TokenCell {
    inner: Arc<RwLock<Option<String>>>,
}

impl TokenCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token; `None` clears it.
    pub fn set(&self, token: Option<String>) {
        *self.inner.write() = token;
    }

    /// Current token, if any.
    pub fn get(&self) -> Option<String> {
        self.inner.read().clone()
    }

    pub fn is_set(&self) -> bool {
        self.inner.read().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let cell = TokenCell::new();
        assert!(!cell.is_set());
        assert_eq!(cell.get(), None);
    }

    #[test]
    fn test_set_and_clear() {
        let cell = TokenCell::new();
        cell.set(Some("abc".to_string()));
        assert!(cell.is_set());
        assert_eq!(cell.get(), Some("abc".to_string()));

        cell.set(None);
        assert!(!cell.is_set());
    }

    #[test]
    fn test_clones_share_state() {
        let cell = TokenCell::new();
        let handle = cell.clone();
        cell.set(Some("abc".to_string()));
        assert_eq!(handle.get(), Some("abc".to_string()));
    }
}

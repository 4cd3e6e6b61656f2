//! Busy/error bookkeeping shared by the stores.

use parking_lot::RwLock;
use serde::Serialize;

/// Snapshot of a store's operation state: one busy flag and the last
/// user-facing error message. Tracks at most one action at a time;
/// overlapping actions overwrite these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Shared cell holding an [`OperationState`]. Every store action brackets
/// itself with `begin` and one of `succeed`/`fail`, so the busy flag is
/// cleared on every exit path.
#[derive(Default)]
pub struct OpState {
    inner: RwLock<OperationState>,
}

impl OpState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action in flight and clear any previous error.
    pub fn begin(&self) {
        let mut state = self.inner.write();
        state.loading = true;
        state.error = None;
    }

    pub fn succeed(&self) {
        let mut state = self.inner.write();
        state.loading = false;
        state.error = None;
    }

    pub fn fail(&self, message: impl Into<String>) {
        let mut state = self.inner.write();
        state.loading = false;
        state.error = Some(message.into());
    }

    /// Reset to the idle state, dropping any recorded error.
    pub fn reset(&self) {
        *self.inner.write() = OperationState::default();
    }

    pub fn snapshot(&self) -> OperationState {
        self.inner.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_clears_previous_error() {
        let op = OpState::new();
        op.fail("boom");
        assert_eq!(op.error(), Some("boom".to_string()));

        op.begin();
        assert!(op.is_loading());
        assert_eq!(op.error(), None);
    }

    #[test]
    fn test_busy_cleared_on_both_outcomes() {
        let op = OpState::new();
        op.begin();
        op.succeed();
        assert_eq!(op.snapshot(), OperationState::default());

        op.begin();
        op.fail("boom");
        let state = op.snapshot();
        assert!(!state.loading);
        assert_eq!(state.error, Some("boom".to_string()));
    }

    #[test]
    fn test_reset() {
        let op = OpState::new();
        op.fail("boom");
        op.reset();
        assert_eq!(op.snapshot(), OperationState::default());
    }
}

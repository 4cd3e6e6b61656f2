//! User collection store: cached list of users kept in sync with the backend.
//!
//! Local mutations happen only after a confirmed backend response. Updates
//! apply a shallow merge as an optimistic placeholder and then re-fetch the
//! whole list so the server stays authoritative.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::error;

use usuarios_common::{ClassifiedUser, NewUser, User, UserPatch};
use usuarios_http::UsuariosApi;

use crate::state::{OpState, OperationState};

const FETCH_ERROR: &str = "Error al obtener usuarios";
const CREATE_ERROR: &str = "Error al crear usuario";
const UPDATE_ERROR: &str = "Error al actualizar usuario";
const DELETE_ERROR: &str = "Error al eliminar usuario";

pub struct UserStore {
    api: Arc<dyn UsuariosApi>,
    users: RwLock<Vec<User>>,
    selected: RwLock<Option<User>>,
    op: OpState,
}

impl UserStore {
    pub fn new(api: Arc<dyn UsuariosApi>) -> Self {
        Self {
            api,
            users: RwLock::new(Vec::new()),
            selected: RwLock::new(None),
            op: OpState::new(),
        }
    }

    /// Replace the whole local collection with the backend's current list.
    /// On failure the previous collection stays and the error is recorded.
    pub async fn fetch_all(&self) {
        self.op.begin();
        match self.api.get_all().await {
            Ok(list) => {
                *self.users.write() = list;
                self.op.succeed();
            }
            Err(err) => {
                error!("[Usuarios] fetch failed: {}", err);
                self.op.fail(err.backend_message().unwrap_or(FETCH_ERROR));
            }
        }
    }

    /// Create a user and append the backend's record to the cache. The error
    /// is re-raised after recording so callers can react to it.
    pub async fn create(&self, new_user: NewUser) -> usuarios_http::Result<User> {
        self.op.begin();
        match self.api.create(&new_user).await {
            Ok(user) => {
                self.users.write().push(user.clone());
                self.op.succeed();
                Ok(user)
            }
            Err(err) => {
                error!("[Usuarios] create failed: {}", err);
                self.op.fail(err.backend_message().unwrap_or(CREATE_ERROR));
                Err(err)
            }
        }
    }

    /// Update a user. On success the patch is shallow-merged into the cached
    /// entry and one full re-fetch reconciles against the server; the update
    /// stays accepted even if that re-fetch fails. Returns false on failure.
    pub async fn update(&self, id: i64, patch: UserPatch) -> bool {
        self.op.begin();
        match self.api.update(id, &patch).await {
            Ok(()) => {
                {
                    let mut users = self.users.write();
                    if let Some(user) = users.iter_mut().find(|u| u.id == id) {
                        patch.apply_to(user);
                    }
                }
                self.op.succeed();
                self.fetch_all().await;
                true
            }
            Err(err) => {
                error!("[Usuarios] update {} failed: {}", id, err);
                self.op.fail(err.backend_message().unwrap_or(UPDATE_ERROR));
                false
            }
        }
    }

    /// Delete a user. The backend call is issued regardless of local cache
    /// membership; success is whatever the backend reports.
    pub async fn delete(&self, id: i64) -> bool {
        self.op.begin();
        match self.api.delete(id).await {
            Ok(()) => {
                self.users.write().retain(|u| u.id != id);
                self.op.succeed();
                true
            }
            Err(err) => {
                error!("[Usuarios] delete {} failed: {}", id, err);
                self.op.fail(err.backend_message().unwrap_or(DELETE_ERROR));
                false
            }
        }
    }

    pub fn select_user(&self, user: User) {
        *self.selected.write() = Some(user);
    }

    pub fn clear_selected_user(&self) {
        *self.selected.write() = None;
    }

    pub fn selected_user(&self) -> Option<User> {
        self.selected.read().clone()
    }

    /// Linear lookup in the cached collection; no network.
    pub fn get_user_by_id(&self, id: i64) -> Option<User> {
        self.users.read().iter().find(|u| u.id == id).cloned()
    }

    /// Every cached user with its classification label and score color.
    pub fn classifications(&self) -> Vec<ClassifiedUser> {
        self.users
            .read()
            .iter()
            .cloned()
            .map(ClassifiedUser::from)
            .collect()
    }

    pub fn users(&self) -> Vec<User> {
        self.users.read().clone()
    }

    pub fn state(&self) -> OperationState {
        self.op.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use usuarios_common::{Credentials, LoginResponse, ScoreColor};
    use usuarios_http::ApiError;

    /// In-memory backend double that counts list calls and can be told to
    /// fail individual operations.
    struct FakeApi {
        users: RwLock<Vec<User>>,
        list_calls: AtomicUsize,
        fail_list: AtomicBool,
        fail_create: bool,
        fail_update: bool,
        fail_delete: bool,
    }

    impl FakeApi {
        fn seeded() -> Self {
            Self {
                users: RwLock::new(vec![
                    user(1, "Ana", "admin", 80),
                    user(2, "Luis", "normal", 45),
                    user(3, "Eva", "normal", 10),
                ]),
                list_calls: AtomicUsize::new(0),
                fail_list: AtomicBool::new(false),
                fail_create: false,
                fail_update: false,
                fail_delete: false,
            }
        }

        fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }
    }

    fn user(id: i64, name: &str, role: &str, score: u8) -> User {
        User {
            id,
            name: name.to_string(),
            surname: "Test".to_string(),
            role: role.to_string(),
            score,
        }
    }

    #[async_trait]
    impl UsuariosApi for FakeApi {
        async fn login(&self, _credentials: &Credentials) -> usuarios_http::Result<LoginResponse> {
            Err(ApiError::Status(500))
        }

        async fn get_all(&self) -> usuarios_http::Result<Vec<User>> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(ApiError::Status(500));
            }
            Ok(self.users.read().clone())
        }

        async fn get_by_id(&self, id: i64) -> usuarios_http::Result<User> {
            self.users
                .read()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or(ApiError::Status(404))
        }

        async fn create(&self, new_user: &NewUser) -> usuarios_http::Result<User> {
            if self.fail_create {
                return Err(ApiError::Backend {
                    status: 400,
                    message: "nombre requerido".to_string(),
                });
            }
            let id = self.users.read().iter().map(|u| u.id).max().unwrap_or(0) + 1;
            let created = User {
                id,
                name: new_user.name.clone(),
                surname: new_user.surname.clone(),
                role: new_user.role.clone(),
                score: new_user.score,
            };
            self.users.write().push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, patch: &UserPatch) -> usuarios_http::Result<()> {
            if self.fail_update {
                return Err(ApiError::Backend {
                    status: 400,
                    message: "usuario invalido".to_string(),
                });
            }
            let mut users = self.users.write();
            if let Some(user) = users.iter_mut().find(|u| u.id == id) {
                patch.apply_to(user);
            }
            Ok(())
        }

        async fn delete(&self, id: i64) -> usuarios_http::Result<()> {
            if self.fail_delete {
                return Err(ApiError::Status(500));
            }
            // Succeeds whether or not the id exists, like the real backend.
            self.users.write().retain(|u| u.id != id);
            Ok(())
        }
    }

    fn store_with(api: FakeApi) -> (UserStore, Arc<FakeApi>) {
        let api = Arc::new(api);
        (UserStore::new(api.clone()), api)
    }

    #[tokio::test]
    async fn test_fetch_all_replaces_collection() {
        let (store, api) = store_with(FakeApi::seeded());
        store.fetch_all().await;
        assert_eq!(store.users().len(), 3);

        api.users.write().push(user(4, "Marta", "normal", 50));
        store.fetch_all().await;
        assert_eq!(store.users().len(), 4);
        assert_eq!(store.state(), OperationState::default());
    }

    #[tokio::test]
    async fn test_fetch_all_failure_keeps_previous_collection() {
        let (store, api) = store_with(FakeApi::seeded());
        store.fetch_all().await;
        assert_eq!(store.users().len(), 3);

        api.fail_list.store(true, Ordering::SeqCst);
        store.fetch_all().await;
        assert_eq!(store.users().len(), 3);
        let state = store.state();
        assert!(!state.loading);
        assert_eq!(state.error, Some(FETCH_ERROR.to_string()));
    }

    #[tokio::test]
    async fn test_fetch_all_is_idempotent() {
        let (store, _api) = store_with(FakeApi::seeded());
        store.fetch_all().await;
        let first = store.users();
        store.fetch_all().await;
        assert_eq!(store.users(), first);
    }

    #[tokio::test]
    async fn test_create_appends_backend_record() {
        let (store, _api) = store_with(FakeApi::seeded());
        store.fetch_all().await;

        let created = store
            .create(NewUser {
                name: "Marta".to_string(),
                surname: "Ruiz".to_string(),
                role: "normal".to_string(),
                score: 55,
            })
            .await
            .unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(store.users().len(), 4);
        assert_eq!(store.get_user_by_id(4), Some(created));
    }

    #[tokio::test]
    async fn test_create_failure_reraises_after_recording() {
        let (store, _api) = store_with(FakeApi {
            fail_create: true,
            ..FakeApi::seeded()
        });
        store.fetch_all().await;

        let err = store
            .create(NewUser {
                name: String::new(),
                surname: String::new(),
                role: "normal".to_string(),
                score: 0,
            })
            .await
            .unwrap_err();
        assert_eq!(err.backend_message(), Some("nombre requerido"));
        assert_eq!(store.state().error, Some("nombre requerido".to_string()));
        assert_eq!(store.users().len(), 3);
    }

    #[tokio::test]
    async fn test_update_merges_and_refetches_exactly_once() {
        let (store, api) = store_with(FakeApi::seeded());
        store.fetch_all().await;
        assert_eq!(api.list_calls(), 1);

        assert!(store.update(1, UserPatch::new().with_score(70)).await);
        assert_eq!(api.list_calls(), 2);
        assert_eq!(store.get_user_by_id(1).unwrap().score, 70);
        assert_eq!(store.state().error, None);
    }

    #[tokio::test]
    async fn test_update_failure_returns_false_without_refetch() {
        let (store, api) = store_with(FakeApi {
            fail_update: true,
            ..FakeApi::seeded()
        });
        store.fetch_all().await;
        assert_eq!(api.list_calls(), 1);

        assert!(!store.update(1, UserPatch::new().with_score(70)).await);
        assert_eq!(api.list_calls(), 1);
        assert_eq!(store.get_user_by_id(1).unwrap().score, 80);
        assert_eq!(store.state().error, Some("usuario invalido".to_string()));
    }

    #[tokio::test]
    async fn test_update_accepted_even_if_reconciliation_fails() {
        let (store, api) = store_with(FakeApi::seeded());
        store.fetch_all().await;

        api.fail_list.store(true, Ordering::SeqCst);
        assert!(store.update(1, UserPatch::new().with_score(70)).await);
        // The merge stays; the failed re-fetch records its own error.
        assert_eq!(store.get_user_by_id(1).unwrap().score, 70);
        assert_eq!(store.state().error, Some(FETCH_ERROR.to_string()));
        assert_eq!(api.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_delete_removes_local_entry() {
        let (store, _api) = store_with(FakeApi::seeded());
        store.fetch_all().await;

        assert!(store.delete(2).await);
        assert_eq!(store.users().len(), 2);
        assert!(store.get_user_by_id(2).is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_id_reports_backend_outcome() {
        let (store, _api) = store_with(FakeApi::seeded());
        store.fetch_all().await;

        assert!(store.delete(999).await);
        assert_eq!(store.users().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_collection() {
        let (store, _api) = store_with(FakeApi {
            fail_delete: true,
            ..FakeApi::seeded()
        });
        store.fetch_all().await;

        assert!(!store.delete(1).await);
        assert_eq!(store.users().len(), 3);
        assert_eq!(store.state().error, Some(DELETE_ERROR.to_string()));
    }

    #[tokio::test]
    async fn test_selected_user_is_purely_local() {
        let (store, api) = store_with(FakeApi::seeded());
        store.fetch_all().await;

        store.select_user(store.get_user_by_id(1).unwrap());
        assert_eq!(store.selected_user().unwrap().id, 1);
        store.clear_selected_user();
        assert_eq!(store.selected_user(), None);
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_get_user_by_id_is_a_cache_lookup() {
        let (store, api) = store_with(FakeApi::seeded());
        store.fetch_all().await;

        assert!(store.get_user_by_id(1).is_some());
        assert!(store.get_user_by_id(999).is_none());
        assert_eq!(api.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_classifications_bucket_scores() {
        let (store, _api) = store_with(FakeApi::seeded());
        store.fetch_all().await;

        let classified = store.classifications();
        assert_eq!(classified.len(), 3);
        assert_eq!(classified[0].color, ScoreColor::Green);
        assert_eq!(classified[0].classification, "admin");
        assert_eq!(classified[1].color, ScoreColor::Orange);
        assert_eq!(classified[2].color, ScoreColor::Red);
    }
}

//! Client-side replica of the user collection.
//!
//! `UserStore` mirrors server state after each successful call made through
//! a [`UsersInfoApi`] and tracks the request lifecycle (`loading`, `error`).
//! Methods take `&self`; overlapping calls are allowed and the last one to
//! finish wins on `loading` and `error`.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::contract::{
    client::UsersInfoApi,
    error::UsersInfoError,
    model::{NewUser, User, UserPatch},
};

/// Observable state of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    /// Server-ordered replica.
    pub users: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Marks a request in flight for as long as it lives.
///
/// Entering sets `loading` and clears `error`; dropping clears `loading`,
/// whether the request succeeded, failed or was cancelled.
struct LoadingScope<'a> {
    state: &'a RwLock<UserState>,
}

impl<'a> LoadingScope<'a> {
    fn enter(state: &'a RwLock<UserState>) -> Self {
        {
            let mut s = state.write();
            s.loading = true;
            s.error = None;
        }
        Self { state }
    }

    /// Record a failure and hand it back for propagation.
    fn fail(&self, err: UsersInfoError) -> UsersInfoError {
        warn!(error = %err, "user store request failed");
        self.state.write().error = Some(err.to_string());
        err
    }
}

impl Drop for LoadingScope<'_> {
    fn drop(&mut self) {
        self.state.write().loading = false;
    }
}

pub struct UserStore {
    api: Arc<dyn UsersInfoApi>,
    state: RwLock<UserState>,
}

impl UserStore {
    pub fn new(api: Arc<dyn UsersInfoApi>) -> Self {
        Self {
            api,
            state: RwLock::new(UserState::default()),
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> UserState {
        self.state.read().clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.read().users.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn error(&self) -> Option<String> {
        self.state.read().error.clone()
    }

    /// Replace the replica with the server's list.
    pub async fn fetch_users(&self) -> Result<(), UsersInfoError> {
        let scope = LoadingScope::enter(&self.state);
        let users = self.api.list_users().await.map_err(|e| scope.fail(e))?;
        debug!(count = users.len(), "replica refreshed");
        self.state.write().users = users;
        Ok(())
    }

    /// Create on the server, then append the returned user.
    pub async fn create_user(&self, new_user: NewUser) -> Result<(), UsersInfoError> {
        let scope = LoadingScope::enter(&self.state);
        let user = self
            .api
            .create_user(new_user)
            .await
            .map_err(|e| scope.fail(e))?;
        self.state.write().users.push(user);
        Ok(())
    }

    /// Update on the server, then replace the matching local entry in place.
    /// A user missing from the replica is not inserted.
    pub async fn update_user(&self, id: &str, patch: UserPatch) -> Result<(), UsersInfoError> {
        let scope = LoadingScope::enter(&self.state);
        let updated = self
            .api
            .update_user(id, patch)
            .await
            .map_err(|e| scope.fail(e))?;

        {
            let mut s = self.state.write();
            match s.users.iter_mut().find(|u| u.id == updated.id) {
                Some(slot) => *slot = updated,
                None => debug!(user_id = %id, "updated user not in replica; skipping"),
            }
        }
        Ok(())
    }

    /// Delete on the server, then drop the matching local entry.
    pub async fn delete_user(&self, id: &str) -> Result<(), UsersInfoError> {
        let scope = LoadingScope::enter(&self.state);
        self.api
            .delete_user(id)
            .await
            .map_err(|e| scope.fail(e))?;
        self.state.write().users.retain(|u| u.id != id);
        Ok(())
    }
}

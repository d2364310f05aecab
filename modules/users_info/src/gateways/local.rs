use async_trait::async_trait;
use std::sync::Arc;

use crate::api::rest::controller::UsersController;
use crate::contract::{
    client::UsersInfoApi,
    error::UsersInfoError,
    model::{NewUser, User, UserPatch},
};

/// Local implementation of the UsersInfoApi trait that delegates to the controller,
/// so in-process callers get the same pre-check behavior as REST clients.
pub struct UsersInfoLocalClient {
    controller: Arc<UsersController>,
}

impl UsersInfoLocalClient {
    pub fn new(controller: Arc<UsersController>) -> Self {
        Self { controller }
    }
}

#[async_trait]
impl UsersInfoApi for UsersInfoLocalClient {
    async fn list_users(&self) -> Result<Vec<User>, UsersInfoError> {
        self.controller.list().await.map_err(Into::into)
    }

    async fn get_user(&self, id: &str) -> Result<User, UsersInfoError> {
        self.controller.get(id).await.map_err(Into::into)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersInfoError> {
        self.controller.create(new_user).await.map_err(Into::into)
    }

    async fn update_user(&self, id: &str, patch: UserPatch) -> Result<User, UsersInfoError> {
        self.controller.update(id, patch).await.map_err(Into::into)
    }

    async fn delete_user(&self, id: &str) -> Result<User, UsersInfoError> {
        self.controller.remove(id).await.map_err(Into::into)
    }
}

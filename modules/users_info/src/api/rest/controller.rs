use std::sync::Arc;

use tracing::{debug, instrument};

use crate::api::rest::error::ApiError;
use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::service::Service;

/// The API Surface: five operations on top of the service.
///
/// `update` and `remove` look the user up first and fail with
/// `ApiError::NotFound` without touching the service's mutation. The lookup
/// and the mutation are not atomic.
#[derive(Clone)]
pub struct UsersController {
    service: Arc<Service>,
}

impl UsersController {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }

    #[instrument(name = "users_info.api.list", skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.service.find_all().await?)
    }

    #[instrument(name = "users_info.api.get", skip(self), fields(user_id = %id))]
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        self.service
            .find_one(id)
            .await?
            .ok_or_else(|| ApiError::not_found(id))
    }

    #[instrument(name = "users_info.api.create", skip_all)]
    pub async fn create(&self, new_user: NewUser) -> Result<User, ApiError> {
        Ok(self.service.create(new_user).await?)
    }

    #[instrument(name = "users_info.api.update", skip(self, patch), fields(user_id = %id))]
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<User, ApiError> {
        self.get(id).await?;
        debug!("pre-check passed, applying patch");
        Ok(self.service.update(id, patch).await?)
    }

    #[instrument(name = "users_info.api.remove", skip(self), fields(user_id = %id))]
    pub async fn remove(&self, id: &str) -> Result<User, ApiError> {
        self.get(id).await?;
        debug!("pre-check passed, deleting");
        Ok(self.service.remove(id).await?)
    }
}

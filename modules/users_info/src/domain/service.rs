use std::sync::Arc;

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;
use tracing::{debug, info, instrument};

/// Domain service for user management.
/// Depends only on the repository port, not on infra types.
///
/// Every call is a passthrough: gateway errors surface unchanged, and
/// mutations do not pre-check existence (the REST controller does).
#[derive(Clone)]
pub struct Service {
    repo: Arc<dyn UsersRepository>,
}

impl Service {
    pub fn new(repo: Arc<dyn UsersRepository>) -> Self {
        Self { repo }
    }

    #[instrument(name = "users_info.service.find_all", skip(self))]
    pub async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let users = self.repo.list_all().await?;
        debug!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(name = "users_info.service.find_one", skip(self), fields(user_id = %id))]
    pub async fn find_one(&self, id: &str) -> Result<Option<User>, DomainError> {
        let found = self.repo.find_by_id(id).await?;
        debug!(found = found.is_some(), "Looked up user");
        Ok(found)
    }

    #[instrument(
        name = "users_info.service.create",
        skip(self, new_user),
        fields(email = %new_user.email)
    )]
    pub async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let user = self.repo.create(new_user).await?;
        info!("Created user with id={}", user.id);
        Ok(user)
    }

    #[instrument(name = "users_info.service.update", skip(self, patch), fields(user_id = %id))]
    pub async fn update(&self, id: &str, patch: UserPatch) -> Result<User, DomainError> {
        let user = self.repo.update_by_id(id, patch).await?;
        info!("Updated user");
        Ok(user)
    }

    #[instrument(name = "users_info.service.remove", skip(self), fields(user_id = %id))]
    pub async fn remove(&self, id: &str) -> Result<User, DomainError> {
        let user = self.repo.delete_by_id(id).await?;
        info!("Deleted user");
        Ok(user)
    }
}

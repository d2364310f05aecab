use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use async_trait::async_trait;

/// Port for the domain layer: persistence operations the domain needs.
/// Object-safe and async-friendly via `async_trait`.
///
/// The gateway owns id generation and timestamps.
#[async_trait]
pub trait UsersRepository: Send + Sync {
    /// All users, in storage order.
    async fn list_all(&self) -> Result<Vec<User>, DomainError>;

    /// `Ok(None)` when no row matches; absence is not an error here.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError>;

    /// Fails with `EmailAlreadyExists` when `email` collides with an existing row.
    async fn create(&self, new_user: NewUser) -> Result<User, DomainError>;

    /// Applies supplied fields verbatim and bumps `updated_at`.
    /// Fails with `UserNotFound` when `id` does not exist.
    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<User, DomainError>;

    /// Returns the deleted row's last known state.
    /// Fails with `UserNotFound` when `id` does not exist.
    async fn delete_by_id(&self, id: &str) -> Result<User, DomainError>;
}

//! SeaORM-backed implementation of the `UsersRepository` port.
//!
//! Generic over the connection so it can run on a `DatabaseConnection`
//! or on anything else that can open transactions.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DbErr, EntityTrait, ModelTrait, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use tracing::warn;
use uuid::Uuid;

use crate::contract::model::{NewUser, User, UserPatch};
use crate::domain::error::DomainError;
use crate::domain::repo::UsersRepository;
use crate::infra::storage::entity::{ActiveModel as UserAM, Column, Entity as UserEntity};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn database_error(op: &str, err: DbErr) -> DomainError {
    warn!(operation = op, error = %err, "users storage failure");
    DomainError::database(format!("{op} failed: {err}"))
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = UserEntity::find()
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.conn)
            .await
            .map_err(|e| database_error("list_all", e))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        let found = UserEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(|e| database_error("find_by_id", e))?;
        Ok(found.map(Into::into))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let now = Utc::now();
        let email = new_user.email.clone();
        let m = UserAM {
            id: Set(Uuid::new_v4().to_string()),
            email: Set(new_user.email),
            name: Set(new_user.name),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match m.insert(&self.conn).await {
            Ok(row) => Ok(row.into()),
            Err(e) if is_unique_violation(&e) => Err(DomainError::email_already_exists(email)),
            Err(e) => Err(database_error("create", e)),
        }
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<User, DomainError> {
        let mut m = UserAM {
            id: Set(id.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(email) = patch.email.clone() {
            m.email = Set(email);
        }
        if let Some(name) = patch.name {
            m.name = Set(name);
        }

        match m.update(&self.conn).await {
            Ok(row) => Ok(row.into()),
            Err(DbErr::RecordNotUpdated) => Err(DomainError::user_not_found(id)),
            Err(e) if is_unique_violation(&e) => Err(DomainError::email_already_exists(
                patch.email.unwrap_or_default(),
            )),
            Err(e) => Err(database_error("update_by_id", e)),
        }
    }

    async fn delete_by_id(&self, id: &str) -> Result<User, DomainError> {
        let txn = self
            .conn
            .begin()
            .await
            .map_err(|e| database_error("delete_by_id", e))?;

        let Some(row) = UserEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| database_error("delete_by_id", e))?
        else {
            return Err(DomainError::user_not_found(id));
        };

        let res = row
            .clone()
            .delete(&txn)
            .await
            .map_err(|e| database_error("delete_by_id", e))?;
        if res.rows_affected == 0 {
            return Err(DomainError::user_not_found(id));
        }

        txn.commit()
            .await
            .map_err(|e| database_error("delete_by_id", e))?;
        Ok(row.into())
    }
}

//! Tests to verify that the service and controller emit expected tracing spans

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use tracing_test::traced_test;

use users_info::api::rest::controller::UsersController;
use users_info::contract::model::{NewUser, User, UserPatch};
use users_info::domain::error::DomainError;
use users_info::domain::repo::UsersRepository;
use users_info::domain::service::Service;

// Mock repository holding a single user
struct MockUsersRepository {
    user: User,
}

impl MockUsersRepository {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            user: User {
                id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
                email: "test@example.com".to_string(),
                name: "Test User".to_string(),
                created_at: now,
                updated_at: now,
            },
        }
    }
}

#[async_trait::async_trait]
impl UsersRepository for MockUsersRepository {
    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(vec![self.user.clone()])
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        Ok((self.user.id == id).then(|| self.user.clone()))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        Err(DomainError::email_already_exists(new_user.email))
    }

    async fn update_by_id(&self, _id: &str, _patch: UserPatch) -> Result<User, DomainError> {
        Ok(self.user.clone())
    }

    async fn delete_by_id(&self, _id: &str) -> Result<User, DomainError> {
        Ok(self.user.clone())
    }
}

fn service() -> Arc<Service> {
    Arc::new(Service::new(Arc::new(MockUsersRepository::new())))
}

#[tokio::test]
#[traced_test]
async fn service_find_one_emits_span() -> Result<()> {
    let svc = service();

    let found = svc.find_one("550e8400-e29b-41d4-a716-446655440000").await?;
    assert!(found.is_some());

    assert!(logs_contain("users_info.service.find_one"));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn service_find_all_logs_count() -> Result<()> {
    let svc = service();

    let users = svc.find_all().await?;
    assert_eq!(users.len(), 1);

    assert!(logs_contain("Listed 1 users"));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn controller_update_runs_precheck_inside_its_span() -> Result<()> {
    let ctl = UsersController::new(service());

    ctl.update("550e8400-e29b-41d4-a716-446655440000", UserPatch::default())
        .await?;

    assert!(logs_contain("users_info.api.update"));
    assert!(logs_contain("users_info.service.find_one"));
    assert!(logs_contain("users_info.service.update"));
    Ok(())
}

#[tokio::test]
#[traced_test]
async fn service_create_failure_is_passed_through() {
    let svc = service();

    let err = svc
        .create(NewUser {
            email: "dup@example.com".into(),
            name: "Dup".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::email_already_exists("dup@example.com"));
    assert!(!logs_contain("Created user"));
}

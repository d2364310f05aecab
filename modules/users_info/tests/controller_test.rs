//! API Surface behavior against a counting in-memory repository.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use users_info::api::rest::controller::UsersController;
use users_info::api::rest::error::ApiError;
use users_info::contract::model::{NewUser, User, UserPatch};
use users_info::domain::error::DomainError;
use users_info::domain::repo::UsersRepository;
use users_info::domain::service::Service;

/// In-memory repository that counts mutation calls.
///
/// With `vanish_before_mutation` set, lookups still see the row but
/// mutations behave as if another caller deleted it in between.
#[derive(Default)]
struct CountingRepo {
    users: Mutex<Vec<User>>,
    updates: AtomicUsize,
    deletes: AtomicUsize,
    vanish_before_mutation: bool,
}

impl CountingRepo {
    fn with_user(id: &str, vanish_before_mutation: bool) -> Self {
        let now = Utc::now();
        Self {
            users: Mutex::new(vec![User {
                id: id.to_string(),
                email: "a@x.com".to_string(),
                name: "Ann".to_string(),
                created_at: now,
                updated_at: now,
            }]),
            vanish_before_mutation,
            ..Default::default()
        }
    }
}

#[async_trait]
impl UsersRepository for CountingRepo {
    async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, DomainError> {
        Ok(self.users.lock().iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.lock();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(DomainError::email_already_exists(new_user.email));
        }
        let now = Utc::now();
        let user = User {
            id: format!("u-{}", users.len() + 1),
            email: new_user.email,
            name: new_user.name,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_by_id(&self, id: &str, patch: UserPatch) -> Result<User, DomainError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.vanish_before_mutation {
            return Err(DomainError::user_not_found(id));
        }
        let mut users = self.users.lock();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<User, DomainError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.vanish_before_mutation {
            return Err(DomainError::user_not_found(id));
        }
        let mut users = self.users.lock();
        let pos = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| DomainError::user_not_found(id))?;
        Ok(users.remove(pos))
    }
}

fn controller(repo: Arc<CountingRepo>) -> UsersController {
    UsersController::new(Arc::new(Service::new(repo)))
}

#[tokio::test]
async fn update_of_missing_user_never_reaches_the_mutation() {
    let repo = Arc::new(CountingRepo::default());
    let ctl = controller(repo.clone());

    let err = ctl
        .update(
            "zzz",
            UserPatch {
                email: None,
                name: Some("Q".into()),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::not_found("zzz"));
    assert_eq!(err.to_string(), "User with ID zzz not found");
    assert_eq!(repo.updates.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn delete_of_missing_user_never_reaches_the_mutation() {
    let repo = Arc::new(CountingRepo::default());
    let ctl = controller(repo.clone());

    let err = ctl.remove("zzz").await.unwrap_err();

    assert_eq!(err, ApiError::not_found("zzz"));
    assert_eq!(repo.deletes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn update_of_existing_user_calls_the_mutation_once() {
    let repo = Arc::new(CountingRepo::with_user("u-1", false));
    let ctl = controller(repo.clone());

    let updated = ctl
        .update(
            "u-1",
            UserPatch {
                email: None,
                name: Some("X".into()),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "X");
    assert_eq!(updated.email, "a@x.com");
    assert_eq!(repo.updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn row_vanishing_after_precheck_surfaces_gateway_error() {
    let repo = Arc::new(CountingRepo::with_user("u-1", true));
    let ctl = controller(repo.clone());

    let err = ctl.update("u-1", UserPatch::default()).await.unwrap_err();
    assert_eq!(err, ApiError::Domain(DomainError::user_not_found("u-1")));

    let err = ctl.remove("u-1").await.unwrap_err();
    assert_eq!(err, ApiError::Domain(DomainError::user_not_found("u-1")));

    assert_eq!(repo.updates.load(Ordering::SeqCst), 1);
    assert_eq!(repo.deletes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn get_missing_user_is_not_found_and_list_empty_is_ok() {
    let ctl = controller(Arc::new(CountingRepo::default()));

    assert!(ctl.list().await.unwrap().is_empty());
    assert_eq!(ctl.get("nope").await.unwrap_err(), ApiError::not_found("nope"));
}

#[tokio::test]
async fn create_conflict_passes_through_unchanged() {
    let ctl = controller(Arc::new(CountingRepo::with_user("u-1", false)));

    let err = ctl
        .create(NewUser {
            email: "a@x.com".into(),
            name: "Another".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Domain(DomainError::email_already_exists("a@x.com"))
    );
}

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::api::rest::{controller::UsersController, routes};
use crate::contract::client::UsersInfoApi;
use crate::domain::service::Service;
use crate::gateways::local::UsersInfoLocalClient;
use crate::infra::storage::{migrations::Migrator, SeaOrmUsersRepository};

/// The users_info module wired onto a database connection:
/// SeaORM repository → service → controller.
#[derive(Clone)]
pub struct UsersInfo {
    controller: Arc<UsersController>,
}

impl UsersInfo {
    pub fn new(db: DatabaseConnection) -> Self {
        info!("Initializing users_info module");
        let repo = SeaOrmUsersRepository::new(db);
        let service = Arc::new(Service::new(Arc::new(repo)));
        Self {
            controller: Arc::new(UsersController::new(service)),
        }
    }

    /// Apply pending schema migrations.
    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running users_info database migrations");
        Migrator::up(db, None).await?;
        info!("Users database migrations completed successfully");
        Ok(())
    }

    pub fn controller(&self) -> Arc<UsersController> {
        self.controller.clone()
    }

    /// In-process client with the same semantics as the REST surface.
    pub fn local_client(&self) -> Arc<dyn UsersInfoApi> {
        Arc::new(UsersInfoLocalClient::new(self.controller.clone()))
    }

    /// Mount the REST routes onto `router`.
    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering users_info REST routes");
        routes::register_routes(router, self.controller.clone())
    }
}

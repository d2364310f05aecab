use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use utoipa::OpenApi;

use crate::api::rest::{controller::UsersController, handlers, openapi::ApiDoc};

/// Mount the users routes and `/openapi.json` on `router`.
pub fn register_routes(router: Router, controller: Arc<UsersController>) -> Router {
    router
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .patch(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .layer(Extension(controller))
}

use std::sync::Arc;

use axum::{
    extract::Path,
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use modkit::api::problem::{Problem, ProblemResponse};
use tracing::{error, info};
use validator::Validate;

use crate::api::rest::controller::UsersController;
use crate::api::rest::dto::{CreateUserReq, UpdateUserReq, UserDto};
use crate::api::rest::error::{map_api_error, validation_problem};

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    operation_id = "users_info.list_users",
    responses(
        (status = 200, description = "All users in server order", body = [UserDto]),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_users(
    Extension(ctl): Extension<Arc<UsersController>>,
    uri: Uri,
) -> Result<Json<Vec<UserDto>>, ProblemResponse> {
    info!("Listing users");

    match ctl.list().await {
        Ok(users) => Ok(Json(users.into_iter().map(UserDto::from).collect())),
        Err(e) => {
            error!("Failed to list users: {}", e);
            Err(map_api_error(&e, uri.path()))
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    operation_id = "users_info.get_user",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_user(
    Extension(ctl): Extension<Arc<UsersController>>,
    Path(id): Path<String>,
    uri: Uri,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Getting user with id: {}", id);

    match ctl.get(&id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to get user {}: {}", id, e);
            Err(map_api_error(&e, uri.path()))
        }
    }
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    operation_id = "users_info.create_user",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_user(
    uri: Uri,
    Extension(ctl): Extension<Arc<UsersController>>,
    Json(req_body): Json<CreateUserReq>,
) -> Result<(StatusCode, Json<UserDto>), ProblemResponse> {
    info!("Creating user with email: {}", req_body.email);

    if let Err(errors) = req_body.validate() {
        return Err(validation_problem(&errors, uri.path()));
    }

    match ctl.create(req_body.into()).await {
        Ok(user) => Ok((StatusCode::CREATED, Json(UserDto::from(user)))),
        Err(e) => {
            error!("Failed to create user: {}", e);
            Err(map_api_error(&e, uri.path()))
        }
    }
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    operation_id = "users_info.update_user",
    params(("id" = String, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Bad Request", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Conflict", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_user(
    uri: Uri,
    Extension(ctl): Extension<Arc<UsersController>>,
    Path(id): Path<String>,
    Json(req_body): Json<UpdateUserReq>,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Updating user {}", id);

    if let Err(errors) = req_body.validate() {
        return Err(validation_problem(&errors, uri.path()));
    }

    match ctl.update(&id, req_body.into()).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to update user {}: {}", id, e);
            Err(map_api_error(&e, uri.path()))
        }
    }
}

/// Delete a user, returning its last known state
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    operation_id = "users_info.delete_user",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted user", body = UserDto),
        (status = 404, description = "Not Found", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_user(
    uri: Uri,
    Extension(ctl): Extension<Arc<UsersController>>,
    Path(id): Path<String>,
) -> Result<Json<UserDto>, ProblemResponse> {
    info!("Deleting user {}", id);

    match ctl.remove(&id).await {
        Ok(user) => Ok(Json(UserDto::from(user))),
        Err(e) => {
            error!("Failed to delete user {}: {}", id, e);
            Err(map_api_error(&e, uri.path()))
        }
    }
}

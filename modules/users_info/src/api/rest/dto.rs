use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::contract::model::{NewUser, User, UserPatch};

/// REST DTO for user representation with serde/utoipa
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// REST DTO for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateUserReq {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 2, message = "must be at least 2 characters long"))]
    #[schema(min_length = 2)]
    pub name: String,
}

/// REST DTO for updating a user (partial)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate, Default)]
pub struct UpdateUserReq {
    #[validate(email(message = "must be a valid email address"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[validate(length(min = 2, message = "must be at least 2 characters long"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

// Conversion implementations between REST DTOs and contract models

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            email: dto.email,
            name: dto.name,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

impl From<CreateUserReq> for NewUser {
    fn from(req: CreateUserReq) -> Self {
        Self {
            email: req.email,
            name: req.name,
        }
    }
}

impl From<NewUser> for CreateUserReq {
    fn from(new_user: NewUser) -> Self {
        Self {
            email: new_user.email,
            name: new_user.name,
        }
    }
}

impl From<UpdateUserReq> for UserPatch {
    fn from(req: UpdateUserReq) -> Self {
        Self {
            email: req.email,
            name: req.name,
        }
    }
}

impl From<UserPatch> for UpdateUserReq {
    fn from(patch: UserPatch) -> Self {
        Self {
            email: patch.email,
            name: patch.name,
        }
    }
}

use thiserror::Error;

/// Errors that are safe to expose to other modules and remote callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsersInfoError {
    #[error("User with ID {id} not found")]
    NotFound { id: String },

    #[error("User with email '{email}' already exists")]
    Conflict { email: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The request never produced a server answer (connection, timeout, decoding).
    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Internal error")]
    Internal,
}

impl UsersInfoError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn conflict(email: impl Into<String>) -> Self {
        Self::Conflict {
            email: email.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<crate::domain::error::DomainError> for UsersInfoError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { id } => Self::not_found(id),
            EmailAlreadyExists { email } => Self::conflict(email),
            Database { .. } => Self::internal(),
        }
    }
}

impl From<crate::api::rest::error::ApiError> for UsersInfoError {
    fn from(api_error: crate::api::rest::error::ApiError) -> Self {
        use crate::api::rest::error::ApiError;
        match api_error {
            ApiError::NotFound { id } => Self::not_found(id),
            ApiError::Domain(e) => e.into(),
        }
    }
}

use thiserror::Error;

/// Errors raised by the storage gateway and passed through the service unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The targeted row does not exist.
    #[error("User not found: {id}")]
    UserNotFound { id: String },

    /// Unique index on `email` rejected the write.
    #[error("User with email '{email}' already exists")]
    EmailAlreadyExists { email: String },

    /// Storage or connection failure; not a logic error.
    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::UserNotFound { id: id.into() }
    }

    pub fn email_already_exists(email: impl Into<String>) -> Self {
        Self::EmailAlreadyExists {
            email: email.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

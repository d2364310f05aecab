use chrono::{DateTime, Utc};

/// Pure user model for inter-module communication (no serde/schemars)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Server-generated, immutable.
    pub id: String,
    /// Unique across all users.
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Always `>= created_at`.
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

/// Partial update data for a user; `None` leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }
}

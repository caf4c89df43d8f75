use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user record.
///
/// `email` is always stored in its normalized (lowercase) form and is unique
/// across the store under case-insensitive comparison. `password_hash` is an
/// opaque salted hash; the plaintext it was derived from is never retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User-supplied input for creating or updating a [`User`].
///
/// `password` is transient: required on create, present on update only when
/// the password is being changed, and discarded once hashed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserDraft {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: None,
        }
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
}

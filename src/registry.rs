use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::UserBackend;
use crate::error::{AppError, AppResult};
use crate::models::{User, UserDraft};
use crate::normalization;
use crate::password::PasswordManager;
use crate::validation::{self, Field, PasswordRequirement, Violation};

/// User registry: the save pipeline in front of the storage backend.
///
/// Every save runs the same explicit sequence: normalize, validate, hash the
/// password (only when validation passed), persist. The duplicate-email check
/// against the store happens during validation for fast, field-attributable
/// error reporting; the backend's own unique constraint remains the
/// authoritative guard under concurrency and surfaces as
/// [`AppError::Constraint`].
pub struct UserRegistry {
    backend: Arc<dyn UserBackend>,
    passwords: PasswordManager,
}

impl UserRegistry {
    pub fn new(backend: Arc<dyn UserBackend>, passwords: PasswordManager) -> Self {
        Self { backend, passwords }
    }

    /// Create a user from a draft.
    ///
    /// The plaintext password is consumed here: it is hashed immediately
    /// after validation and never stored.
    pub async fn create_user(&self, draft: UserDraft) -> AppResult<User> {
        let mut draft = draft;
        normalization::normalize_draft(&mut draft);

        let mut errors = validation::validate_draft(&draft, PasswordRequirement::Required);

        // Only probe the store for duplicates when the email itself is usable
        if !errors.has(Field::Email) {
            if self.backend.find_user_by_email(&draft.email).await?.is_some() {
                errors.push(Violation::new(Field::Email, "is already taken"));
            }
        }

        if !errors.is_empty() {
            debug!(%errors, "rejected user creation");
            return Err(AppError::Validation(errors));
        }

        let plaintext = draft
            .password
            .take()
            .ok_or_else(|| AppError::Internal("validated draft lost its password".to_string()))?;
        let password_hash = self.passwords.hash_password(&plaintext)?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: draft.name,
            email: draft.email,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let created = self.backend.insert_user(&user).await?;
        info!(user_id = %created.id, "created user");
        Ok(created)
    }

    /// Update an existing user through the same normalize-validate pipeline.
    ///
    /// Returns `Ok(None)` when no user has the given id. The draft's password
    /// is optional: omitted means "keep the current hash". The duplicate
    /// check excludes the record's own prior state, so a user may keep (or
    /// re-case) their own email.
    pub async fn update_user(&self, id: &str, draft: UserDraft) -> AppResult<Option<User>> {
        let existing = match self.backend.find_user_by_id(id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let mut draft = draft;
        normalization::normalize_draft(&mut draft);

        let mut errors = validation::validate_draft(&draft, PasswordRequirement::Optional);

        if !errors.has(Field::Email) {
            if let Some(other) = self.backend.find_user_by_email(&draft.email).await? {
                if other.id != existing.id {
                    errors.push(Violation::new(Field::Email, "is already taken"));
                }
            }
        }

        if !errors.is_empty() {
            debug!(user_id = %id, %errors, "rejected user update");
            return Err(AppError::Validation(errors));
        }

        let password_hash = match draft.password.take() {
            Some(plaintext) => self.passwords.hash_password(&plaintext)?,
            None => existing.password_hash.clone(),
        };

        let updated = User {
            id: existing.id.clone(),
            name: draft.name,
            email: draft.email,
            password_hash,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        let saved = self.backend.update_user(id, &updated).await?;
        if saved.is_some() {
            info!(user_id = %id, "updated user");
        }
        Ok(saved)
    }

    /// Check a plaintext password against the stored hash for an email.
    ///
    /// Unknown emails report `false` rather than an error so callers cannot
    /// distinguish a missing account from a wrong password.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<bool> {
        match self.backend.find_user_by_email(email).await? {
            Some(user) => self.passwords.verify_password(password, &user.password_hash),
            None => Ok(false),
        }
    }

    pub async fn find_user(&self, id: &str) -> AppResult<Option<User>> {
        self.backend.find_user_by_id(id).await
    }

    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.backend.find_user_by_email(email).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.backend.find_all_users().await
    }

    pub async fn delete_user(&self, id: &str) -> AppResult<bool> {
        let removed = self.backend.delete_user(id).await?;
        if removed {
            info!(user_id = %id, "deleted user");
        }
        Ok(removed)
    }
}

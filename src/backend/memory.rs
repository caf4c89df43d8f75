use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Backend, BackendSettings, UserBackend};
use crate::error::{AppError, AppResult};
use crate::models::User;

/// In-memory storage backend
///
/// Used by tests and zero-setup runs. The case-insensitive email uniqueness
/// check runs under the write lock, so it is atomic against concurrent
/// writers just like the SQLite unique index.
pub struct MemoryBackend {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn connect(_settings: &BackendSettings) -> AppResult<Self> {
        Ok(Self::new())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UserBackend for MemoryBackend {
    async fn insert_user(&self, user: &User) -> AppResult<User> {
        let mut users = self.users.write().await;

        let candidate = user.email.to_lowercase();
        if users
            .values()
            .any(|existing| existing.email.to_lowercase() == candidate)
        {
            return Err(AppError::Constraint(
                "email is already registered".to_string(),
            ));
        }
        if users.contains_key(&user.id) {
            return Err(AppError::Constraint("id is already taken".to_string()));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        let candidate = email.to_lowercase();
        Ok(users
            .values()
            .find(|user| user.email.to_lowercase() == candidate)
            .cloned())
    }

    async fn find_all_users(&self) -> AppResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(all)
    }

    async fn update_user(&self, id: &str, user: &User) -> AppResult<Option<User>> {
        let mut users = self.users.write().await;

        if !users.contains_key(id) {
            return Ok(None);
        }

        let candidate = user.email.to_lowercase();
        if users
            .values()
            .any(|existing| existing.id != id && existing.email.to_lowercase() == candidate)
        {
            return Err(AppError::Constraint(
                "email is already registered".to_string(),
            ));
        }

        users.insert(id.to_string(), user.clone());
        Ok(users.get(id).cloned())
    }

    async fn delete_user(&self, id: &str) -> AppResult<bool> {
        let mut users = self.users.write().await;
        Ok(users.remove(id).is_some())
    }
}

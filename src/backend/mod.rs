use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::User;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// Supported storage backend types
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseType {
    SQLite,
    Memory,
}

/// Connection settings handed to [`BackendFactory`].
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub database_type: DatabaseType,
    pub connection_url: String,
    pub max_connections: u32,
}

/// Core backend abstraction
///
/// Any storage backend must implement this to be usable by the registry.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Connect and initialize the storage backend
    async fn connect(settings: &BackendSettings) -> AppResult<Self>
    where
        Self: Sized;

    /// Check if the storage backend is healthy and accessible
    async fn health_check(&self) -> AppResult<()>;

    /// Create tables and indexes if they do not exist yet
    ///
    /// This is where the case-insensitive unique constraint on email is set
    /// up. That constraint, not the registry's pre-check, is the correctness
    /// boundary against concurrent writers.
    async fn init_schema(&self) -> AppResult<()>;
}

/// User record storage operations
///
/// Email lookups compare case-insensitively. Inserts and updates that would
/// leave two records with case-insensitively equal emails must fail with
/// [`crate::error::AppError::Constraint`].
#[async_trait]
pub trait UserBackend: Backend {
    /// Persist a new user record
    async fn insert_user(&self, user: &User) -> AppResult<User>;

    /// Find a user by ID
    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>>;

    /// Find a user by email (case-insensitive)
    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Find all users, ordered by creation time
    async fn find_all_users(&self) -> AppResult<Vec<User>>;

    /// Replace an existing user record, returning None when the id is unknown
    async fn update_user(&self, id: &str, user: &User) -> AppResult<Option<User>>;

    /// Delete a user, returning whether a record was removed
    async fn delete_user(&self, id: &str) -> AppResult<bool>;
}

/// Factory for creating backend instances
pub struct BackendFactory;

impl BackendFactory {
    /// Create a backend based on settings
    pub async fn create(settings: &BackendSettings) -> AppResult<Arc<dyn UserBackend>> {
        let backend = Self::create_backend(settings).await?;
        Ok(Arc::from(backend))
    }

    /// Create a backend based on settings (returns Box)
    pub async fn create_backend(settings: &BackendSettings) -> AppResult<Box<dyn UserBackend>> {
        match settings.database_type {
            DatabaseType::SQLite => {
                let backend = SqliteBackend::connect(settings).await?;
                Ok(Box::new(backend))
            }
            DatabaseType::Memory => {
                let backend = MemoryBackend::connect(settings).await?;
                Ok(Box::new(backend))
            }
        }
    }
}

use std::sync::Arc;

use user_registry::backend::{
    BackendFactory, BackendSettings, DatabaseType, UserBackend,
};
use user_registry::password::{PasswordAlgorithm, PasswordManager};
use user_registry::{UserDraft, UserRegistry};

/// Backend settings for an in-memory SQLite database
///
/// One connection only: every pooled connection to `:memory:` would otherwise
/// see its own separate database.
pub fn sqlite_memory_settings() -> BackendSettings {
    BackendSettings {
        database_type: DatabaseType::SQLite,
        connection_url: ":memory:".to_string(),
        max_connections: 1,
    }
}

pub fn memory_settings() -> BackendSettings {
    BackendSettings {
        database_type: DatabaseType::Memory,
        connection_url: String::new(),
        max_connections: 1,
    }
}

/// Create a backend for testing and initialize its schema
pub async fn setup_backend(settings: &BackendSettings) -> Arc<dyn UserBackend> {
    let backend = BackendFactory::create(settings)
        .await
        .expect("backend creation failed");
    backend.init_schema().await.expect("schema init failed");
    backend
}

/// Registry over a fresh backend, bcrypt hashes (cheapest to compute in tests
/// while still exercising a real salted hash)
pub async fn setup_registry(settings: &BackendSettings) -> UserRegistry {
    let backend = setup_backend(settings).await;
    UserRegistry::new(backend, PasswordManager::new(PasswordAlgorithm::Bcrypt))
}

/// Registry sharing an already-created backend
pub fn registry_over(backend: Arc<dyn UserBackend>) -> UserRegistry {
    UserRegistry::new(backend, PasswordManager::new(PasswordAlgorithm::Bcrypt))
}

pub fn draft(name: &str, email: &str, password: &str) -> UserDraft {
    UserDraft::new(name, email).with_password(password)
}

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::{BackendSettings, DatabaseType};
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BackendConfig {
    #[serde(rename = "type")]
    pub backend_type: String,
    pub database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PasswordConfig {
    /// Algorithm for newly created hashes ("argon2id" or "bcrypt").
    /// Existing hashes keep verifying regardless of this setting.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
}

fn default_algorithm() -> String {
    "argon2id".to_string()
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let contents = fs::read_to_string(&path).map_err(|e| {
            AppError::Configuration(format!(
                "Failed to read {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_yaml::from_str(&contents)
            .map_err(|e| AppError::Configuration(format!("Failed to parse configuration: {}", e)))
    }

    /// Zero-setup default: in-memory backend, Argon2id hashes
    pub fn default_config() -> Self {
        Self {
            backend: BackendConfig {
                backend_type: "memory".to_string(),
                database: None,
            },
            password: PasswordConfig::default(),
        }
    }

    /// Resolve the backend section into factory settings
    pub fn backend_settings(&self) -> AppResult<BackendSettings> {
        match self.backend.backend_type.as_str() {
            "memory" => Ok(BackendSettings {
                database_type: DatabaseType::Memory,
                connection_url: String::new(),
                max_connections: 1,
            }),
            "sqlite" => {
                let database = self.backend.database.as_ref().ok_or_else(|| {
                    AppError::Configuration(
                        "Database configuration is required for the sqlite backend".to_string(),
                    )
                })?;

                Ok(BackendSettings {
                    database_type: DatabaseType::SQLite,
                    connection_url: database.url.clone(),
                    max_connections: database.max_connections,
                })
            }
            other => Err(AppError::Configuration(format!(
                "Unsupported backend type: {}",
                other
            ))),
        }
    }
}

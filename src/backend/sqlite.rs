use async_trait::async_trait;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::debug;

use super::{Backend, BackendSettings, UserBackend};
use crate::error::{AppError, AppResult};
use crate::models::User;

/// SQLite storage backend
///
/// The `users` table carries a unique index on `LOWER(email)`, so a duplicate
/// that slips past the registry's pre-check under concurrency is still
/// rejected here, atomically, and surfaces as [`AppError::Constraint`].
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn connect(settings: &BackendSettings) -> AppResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.connection_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to SQLite: {}", e)))?;

        debug!(url = %settings.connection_url, "connected to SQLite");

        Ok(Self { pool })
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn init_schema(&self) -> AppResult<()> {
        let users_sql = r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#;

        sqlx::query(users_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Storage-level guard: no two rows may share an email under
        // case-insensitive comparison, regardless of concurrent writers.
        let email_index_sql =
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_ci ON users (LOWER(email))";

        sqlx::query(email_index_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create email index: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl UserBackend for SqliteBackend {
    async fn insert_user(&self, user: &User) -> AppResult<User> {
        let sql = r#"
            INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#;

        sqlx::query(sql)
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_database_error(e, "insert user"))?;

        Ok(user.clone())
    }

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let sql = r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users WHERE id = ?1
        "#;

        sqlx::query_as::<_, User>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to find user by id: {}", e)))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let sql = r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users WHERE LOWER(email) = LOWER(?1)
        "#;

        sqlx::query_as::<_, User>(sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to find user by email: {}", e)))
    }

    async fn find_all_users(&self) -> AppResult<Vec<User>> {
        let sql = r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users ORDER BY created_at, id
        "#;

        sqlx::query_as::<_, User>(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to list users: {}", e)))
    }

    async fn update_user(&self, id: &str, user: &User) -> AppResult<Option<User>> {
        let sql = r#"
            UPDATE users
            SET name = ?1, email = ?2, password_hash = ?3, updated_at = ?4
            WHERE id = ?5
        "#;

        let result = sqlx::query(sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.updated_at)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_database_error(e, "update user"))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.find_user_by_id(id).await
    }

    async fn delete_user(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map database errors, distinguishing unique-constraint rejections
fn map_database_error(error: sqlx::Error, context: &str) -> AppError {
    let error_str = error.to_string();
    if error_str.contains("UNIQUE constraint") || error_str.contains("unique constraint") {
        AppError::Constraint("email is already registered".to_string())
    } else {
        AppError::Database(format!("Failed to {}: {}", context, error_str))
    }
}

use bcrypt::{hash, verify, DEFAULT_COST};

use super::{PasswordAlgorithm, PasswordHasher};
use crate::error::{AppError, AppResult};

/// bcrypt password hasher
///
/// Kept so records hashed by earlier deployments keep verifying; new hashes
/// normally use Argon2id.
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a new bcrypt hasher with default cost (12)
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a new bcrypt hasher with custom cost
    ///
    /// Cost must be between 4 and 31. Higher values are more secure but slower.
    pub fn with_cost(cost: u32) -> AppResult<Self> {
        if !(4..=31).contains(&cost) {
            return Err(AppError::Configuration(
                "bcrypt cost must be between 4 and 31".to_string(),
            ));
        }

        Ok(Self { cost })
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.cost)
            .map_err(|e| AppError::Internal(format!("Failed to hash password with bcrypt: {}", e)))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        verify(password, hash)
            .map_err(|e| AppError::Internal(format!("Failed to verify bcrypt password: {}", e)))
    }

    fn is_hash(&self, value: &str) -> bool {
        // bcrypt hashes start with $2a$, $2b$, $2x$, or $2y$ and are 60 characters
        value.starts_with("$2") && value.len() == 60 && value.matches('$').count() == 3
    }

    fn algorithm(&self) -> PasswordAlgorithm {
        PasswordAlgorithm::Bcrypt
    }
}

use std::str::FromStr;

use crate::error::{AppError, AppResult};

/// Password hashing algorithm types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordAlgorithm {
    /// bcrypt algorithm, kept for records hashed by older deployments
    Bcrypt,
    /// Argon2id algorithm (OWASP recommended for new passwords)
    Argon2id,
}

impl Default for PasswordAlgorithm {
    fn default() -> Self {
        Self::Argon2id
    }
}

impl std::fmt::Display for PasswordAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bcrypt => write!(f, "bcrypt"),
            Self::Argon2id => write!(f, "Argon2id"),
        }
    }
}

impl FromStr for PasswordAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bcrypt" => Ok(Self::Bcrypt),
            "argon2id" | "argon2" => Ok(Self::Argon2id),
            other => Err(AppError::Configuration(format!(
                "Unknown password algorithm: {}",
                other
            ))),
        }
    }
}

/// Abstract trait for password hashing algorithms
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh random salt
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verify a plaintext password against a hash
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;

    /// Check if a string is a hash created by this algorithm
    fn is_hash(&self, value: &str) -> bool;

    /// Get the algorithm identifier
    fn algorithm(&self) -> PasswordAlgorithm;
}

pub mod argon2_hasher;
pub mod bcrypt_hasher;

pub use argon2_hasher::Argon2idHasher;
pub use bcrypt_hasher::BcryptHasher;

/// Password manager with support for multiple algorithms
///
/// New hashes are produced with the configured current algorithm; verification
/// dispatches on the stored hash format, so records written under an older
/// algorithm keep verifying after a configuration change.
pub struct PasswordManager {
    current_algorithm: PasswordAlgorithm,
    hashers: Vec<Box<dyn PasswordHasher>>,
}

impl Default for PasswordManager {
    fn default() -> Self {
        Self::new(PasswordAlgorithm::default())
    }
}

impl PasswordManager {
    /// Create a new PasswordManager with specified default algorithm
    pub fn new(current_algorithm: PasswordAlgorithm) -> Self {
        let hashers: Vec<Box<dyn PasswordHasher>> = vec![
            Box::new(BcryptHasher::new()),
            Box::new(Argon2idHasher::new()),
        ];

        Self {
            current_algorithm,
            hashers,
        }
    }

    /// Hash a plaintext password using the current algorithm
    ///
    /// Length and presence policy is enforced by the validation layer before
    /// this is reached; any fault here is unrecoverable for the caller.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let hasher = self
            .hashers
            .iter()
            .find(|h| h.algorithm() == self.current_algorithm)
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Hasher not found for algorithm: {}",
                    self.current_algorithm
                ))
            })?;

        hasher.hash_password(password)
    }

    /// Verify a plaintext password against any supported hash format
    pub fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        for hasher in &self.hashers {
            if hasher.is_hash(hash) {
                return hasher.verify_password(password, hash);
            }
        }

        Err(AppError::Internal("Unsupported hash format".to_string()))
    }

    /// Detect the algorithm used for a given hash
    pub fn detect_algorithm(&self, hash: &str) -> Option<PasswordAlgorithm> {
        self.hashers
            .iter()
            .find(|hasher| hasher.is_hash(hash))
            .map(|hasher| hasher.algorithm())
    }

    /// Get the current default algorithm
    pub fn current_algorithm(&self) -> PasswordAlgorithm {
        self.current_algorithm
    }
}

pub mod backend;
pub mod config;
pub mod error;
pub mod models;
pub mod normalization;
pub mod password;
pub mod registry;
pub mod validation;

// Re-export commonly used types for easier access
pub use error::{AppError, AppResult};
pub use models::{User, UserDraft};
pub use registry::UserRegistry;

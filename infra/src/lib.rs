//! # Infrastructure Layer
//!
//! This crate implements the collaborators the Tollgate core depends on:
//!
//! - **Memory**: process-local user and token stores
//! - **Database**: MySQL user and token stores using SQLx
//! - **Credentials**: bcrypt password verification
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

// Re-export core types for convenience
pub use tg_core::errors::*;

/// Credential verification backed by bcrypt
pub mod credentials;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// In-memory token store
pub mod memory;

pub use credentials::BcryptCredentialVerifier;
pub use memory::{InMemoryTokenRepository, InMemoryUserRepository};

/// Load a `.env` file if one is present
///
/// Returns the path that was loaded, if any. This runs before logging is
/// installed, so the caller reports the outcome.
pub fn load_dotenv() -> Option<std::path::PathBuf> {
    dotenvy::dotenv().ok()
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// General infrastructure error
    #[error("Infrastructure error: {0}")]
    General(String),
}

impl From<DomainError> for InfrastructureError {
    fn from(error: DomainError) -> Self {
        InfrastructureError::General(error.to_string())
    }
}

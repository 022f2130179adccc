//! MySQL repository implementations

mod token_repository_impl;
mod user_repository_impl;

pub use token_repository_impl::MySqlTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use tg_core::errors::DomainError;

/// Wraps a driver error as a store failure
pub(crate) fn store_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("{}: {}", context, e),
    }
}

/// `true` if the error is a unique key violation
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

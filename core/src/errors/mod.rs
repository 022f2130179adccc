//! Domain error types.
//!
//! Authentication failures collapse into one variant per operation:
//! [`AuthError::InvalidCredentials`] for login and [`TokenError::InvalidToken`]
//! for refresh. Collaborator faults stay distinguishable as
//! [`DomainError::ServiceUnavailable`].

mod types;


pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A store or credential verifier could not be reached or failed
    #[error("Service unavailable: {message}")]
    ServiceUnavailable { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// `true` for the opaque login/refresh failures
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self, DomainError::Auth(_) | DomainError::Token(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

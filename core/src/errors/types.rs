//! Authentication failure types
//!
//! Each enum has a single variant on purpose: callers cannot tell which
//! check failed.

use thiserror::Error;

/// Login failure, returned for unknown users and wrong passwords alike
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Refresh failure, returned for every rejected access/refresh token pair
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
}

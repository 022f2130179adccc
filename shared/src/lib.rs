//! Shared configuration and common types for the Tollgate server
//!
//! This crate provides functionality used across all server modules:
//! - Configuration types (auth, database, server, environment)
//! - The JSON error body returned by the HTTP layer
//! - Email normalisation and validation helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, DatabaseConfig, Environment, JwtConfig, LoggingConfig,
    ServerConfig, StoreBackend,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::email;

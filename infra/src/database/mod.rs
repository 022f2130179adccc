//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - Schema bootstrap for the user and refresh token tables
//! - Repository implementations with transactional token rotation

pub mod connection;
pub mod mysql;
pub mod schema;


// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{MySqlTokenRepository, MySqlUserRepository};
pub use schema::ensure_schema;

//! # Tollgate Core
//!
//! Domain layer for access token issuance and refresh token rotation.
//! This crate contains domain entities, the token codec and generator,
//! repository and collaborator interfaces, and the lifecycle service that
//! orchestrates login and refresh.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

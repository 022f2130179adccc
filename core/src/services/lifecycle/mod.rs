//! Token lifecycle module
//!
//! Orchestrates the two authentication operations:
//! - Login: verify credentials, issue an access token and a fresh refresh token
//! - Refresh: exchange an access/refresh token pair for a new pair, revoking the used refresh token

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::LifecycleConfig;
pub use service::TokenLifecycleService;

//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token signing, token lifetimes and password hashing cost
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server binding

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use auth::{AuthConfig, JwtConfig, SeedUserConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Which token store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local store, lost on restart
    Memory,
    /// MySQL via sqlx
    Mysql,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Memory
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" | "inmemory" => Ok(StoreBackend::Memory),
            "mysql" => Ok(StoreBackend::Mysql),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl StoreBackend {
    /// Read `STORE_BACKEND`, falling back to the in-memory store
    pub fn from_env() -> Self {
        std::env::var("STORE_BACKEND")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration (used by the MySQL store)
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Token store backend
    #[serde(default)]
    pub store: StoreBackend,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            store: StoreBackend::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let mut logging = LoggingConfig::for_environment(environment);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            store: StoreBackend::from_env(),
            logging,
        }
    }

    /// Check the configuration for settings that must not reach production
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Configuration is usable in the current environment
    /// * `Err(String)` - Description of the first problem found
    pub fn validate(&self) -> Result<(), String> {
        if self.environment.is_production() && self.auth.jwt.is_using_default_secret() {
            return Err("JWT_SECRET must be set in production".to_string());
        }
        if self.environment.is_production() && self.store == StoreBackend::Memory {
            return Err("The in-memory store cannot be used in production".to_string());
        }
        self.auth.validate()
    }
}

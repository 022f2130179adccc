//! Authentication configuration: token signing, lifetimes and password hashing

use serde::{Deserialize, Serialize};

const DEFAULT_JWT_SECRET: &str = "development-secret-change-in-production-0000";

/// Minimum accepted length of the HS256 signing secret in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// JWT access token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Symmetric key for signing access tokens
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: 900, // 15 minutes
            issuer: String::from("tollgate"),
            audience: String::from("tollgate-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set access token expiry in seconds
    pub fn with_access_expiry_seconds(mut self, seconds: i64) -> Self {
        self.access_token_expiry = seconds;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// A single user to create at startup when running on the in-memory store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedUserConfig {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Refresh token lifetime in days
    pub refresh_token_expiry_days: i64,

    /// Whether the refresh flow accepts a correctly signed but expired access token
    #[serde(default = "default_accept_expired")]
    pub refresh_accepts_expired_access_token: bool,

    /// bcrypt work factor for password hashes
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// Optional user seeded into the in-memory store
    #[serde(default)]
    pub seed_user: Option<SeedUserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            refresh_token_expiry_days: 14,
            refresh_accepts_expired_access_token: default_accept_expired(),
            bcrypt_cost: default_bcrypt_cost(),
            seed_user: None,
        }
    }
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let jwt_defaults = JwtConfig::default();

        let secret = std::env::var("JWT_SECRET").unwrap_or(jwt_defaults.secret);
        let issuer = std::env::var("JWT_ISSUER").unwrap_or(jwt_defaults.issuer);
        let audience = std::env::var("JWT_AUDIENCE").unwrap_or(jwt_defaults.audience);
        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(jwt_defaults.access_token_expiry);
        let refresh_token_expiry_days = std::env::var("REFRESH_TOKEN_EXPIRY_DAYS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.refresh_token_expiry_days);
        let refresh_accepts_expired_access_token =
            std::env::var("REFRESH_ACCEPTS_EXPIRED_ACCESS_TOKEN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_accepts_expired_access_token);
        let bcrypt_cost = std::env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.bcrypt_cost);

        let seed_user = match (
            std::env::var("SEED_USER_EMAIL"),
            std::env::var("SEED_USER_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) => Some(SeedUserConfig {
                email,
                password,
                first_name: std::env::var("SEED_USER_FIRST_NAME").unwrap_or_default(),
                last_name: std::env::var("SEED_USER_LAST_NAME").unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            jwt: JwtConfig {
                secret,
                access_token_expiry,
                issuer,
                audience,
            },
            refresh_token_expiry_days,
            refresh_accepts_expired_access_token,
            bcrypt_cost,
            seed_user,
        }
    }

    /// Get access token expiry in seconds
    pub fn access_token_expiry_seconds(&self) -> i64 {
        self.jwt.access_token_expiry
    }

    /// Get refresh token expiry in seconds
    pub fn refresh_token_expiry_seconds(&self) -> i64 {
        self.refresh_token_expiry_days * 86400
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry_days = days;
        self
    }

    /// Check lifetimes, secret length and hashing cost
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < MIN_SECRET_LENGTH {
            return Err(format!(
                "JWT secret must be at least {} bytes",
                MIN_SECRET_LENGTH
            ));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err("Access token expiry must be positive".to_string());
        }
        if self.refresh_token_expiry_days <= 0 {
            return Err("Refresh token expiry must be positive".to_string());
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(format!("Invalid bcrypt cost: {}", self.bcrypt_cost));
        }
        Ok(())
    }
}

fn default_accept_expired() -> bool {
    true
}

fn default_bcrypt_cost() -> u32 {
    12
}

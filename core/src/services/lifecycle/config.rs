//! Configuration for the token lifecycle service

use chrono::Duration;

use tg_shared::config::AuthConfig;

use crate::domain::entities::token::DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS;
use crate::services::token::ExpiryPolicy;

/// Configuration for the token lifecycle service
#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    /// How long a newly issued refresh token stays usable
    pub refresh_token_lifetime: Duration,
    /// Whether refresh accepts a correctly signed access token past its expiry
    pub accept_expired_access_tokens: bool,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            refresh_token_lifetime: Duration::days(DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS),
            accept_expired_access_tokens: true,
        }
    }
}

impl LifecycleConfig {
    pub fn from_auth_config(config: &AuthConfig) -> Self {
        Self {
            refresh_token_lifetime: Duration::days(config.refresh_token_expiry_days),
            accept_expired_access_tokens: config.refresh_accepts_expired_access_token,
        }
    }

    /// Expiry policy applied to the access token presented on refresh
    pub fn refresh_expiry_policy(&self) -> ExpiryPolicy {
        if self.accept_expired_access_tokens {
            ExpiryPolicy::AllowExpired
        } else {
            ExpiryPolicy::Enforce
        }
    }
}

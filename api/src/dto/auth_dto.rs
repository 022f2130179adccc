use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/v1/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Body of `POST /api/v1/auth/refresh`
///
/// Only size limits are checked here. Empty or unknown values reach the
/// lifecycle service and are rejected there with the same error as any
/// other bad token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// Access token, possibly expired
    #[validate(length(max = 4096))]
    pub token: String,
    #[validate(length(max = 512))]
    pub refresh_token: String,
}

//! Authentication response value object for API responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;

/// Result of a successful login or refresh
///
/// Carries the token pair together with the profile fields a client needs
/// right after authenticating.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// User identifier
    pub id: Uuid,

    /// User email
    pub email: String,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Signed access token
    pub token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Opaque refresh token
    pub refresh_token: String,

    /// Absolute expiry of the refresh token
    pub refresh_token_expiration: DateTime<Utc>,
}

impl AuthResponse {
    /// Creates an authentication response from a token pair and the user it was issued to
    pub fn from_token_pair(token_pair: TokenPair, user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            token: token_pair.access_token,
            expires_in: token_pair.expires_in,
            refresh_token: token_pair.refresh_token,
            refresh_token_expiration: token_pair.refresh_token_expires_at,
        }
    }
}

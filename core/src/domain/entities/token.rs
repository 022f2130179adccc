//! Token entities for access token claims and stored refresh tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token lifetime (15 minutes)
pub const DEFAULT_ACCESS_TOKEN_EXPIRY_SECONDS: i64 = 15 * 60;

/// Default refresh token lifetime (14 days)
pub const DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS: i64 = 14;

/// Claims structure for the access token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID, keeps tokens minted in the same second distinct
    pub jti: String,
}

impl AccessTokenClaims {
    /// Creates claims for a subject issued at `issued_at` and expiring at `expires_at`
    pub fn new(
        user_id: Uuid,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks expiry against `now` with no leeway
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Logical state of a refresh token record at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshTokenState {
    /// Usable for exactly one refresh
    Active,
    /// Past its expiry and never revoked
    Expired,
    /// Consumed by a refresh or otherwise invalidated
    Revoked,
}

/// Refresh token record stored per user
///
/// Only the SHA-256 digest of the opaque value is kept; the value itself is
/// returned to the client once and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the record
    pub id: Uuid,

    /// User this token belongs to
    pub user_id: Uuid,

    /// Hex SHA-256 digest of the token value
    pub token_hash: String,

    /// Timestamp when the token was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp from which the token is inert
    pub expires_at: DateTime<Utc>,

    /// Set once, when the token is consumed or invalidated
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates a new active refresh token record
    ///
    /// # Arguments
    ///
    /// * `user_id` - Owner of the token
    /// * `token_hash` - Digest of the opaque value
    /// * `created_at` - Issuance time
    /// * `lifetime` - Time until the token expires
    pub fn new(
        user_id: Uuid,
        token_hash: String,
        created_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at,
            expires_at: created_at + lifetime,
            revoked_at: None,
        }
    }

    /// `true` once `now` reaches `expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// `true` if a revocation time has been recorded
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// `true` if neither revoked nor expired at `now`
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }

    /// Logical state at `now`; revocation takes precedence over expiry
    pub fn state(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.is_revoked() {
            RefreshTokenState::Revoked
        } else if self.is_expired(now) {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }

    /// Revokes the token
    ///
    /// Returns `false` and keeps the original timestamp if the token was
    /// already revoked.
    pub fn revoke(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_revoked() {
            return false;
        }
        self.revoked_at = Some(at);
        true
    }
}

/// Freshly issued access and refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// Signed access token
    pub access_token: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,

    /// Opaque refresh token value
    pub refresh_token: String,

    /// Absolute expiry of the refresh token
    pub refresh_token_expires_at: DateTime<Utc>,
}

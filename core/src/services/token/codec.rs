//! HS256 access token signing and validation

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use tg_shared::config::auth::{JwtConfig, MIN_SECRET_LENGTH};

use crate::domain::entities::token::AccessTokenClaims;
use crate::errors::DomainError;

/// How `validate` treats the `exp` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// Reject tokens whose expiry is at or before `now`
    Enforce,
    /// Accept a correctly signed token regardless of its expiry
    AllowExpired,
}

/// A freshly signed access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedAccessToken {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
}

/// Signs and validates access tokens
///
/// Expiry is always judged against the `now` the caller passes in, with no
/// leeway. The library's own clock-based checks are switched off.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl AccessTokenCodec {
    /// Creates a codec from JWT configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Secret, issuer, audience and access token lifetime
    ///
    /// # Returns
    ///
    /// * `Ok(AccessTokenCodec)` - Ready to sign and validate
    /// * `Err(DomainError::Configuration)` - Secret shorter than 32 bytes or non-positive lifetime
    pub fn new(config: &JwtConfig) -> Result<Self, DomainError> {
        if config.secret.len() < MIN_SECRET_LENGTH {
            return Err(DomainError::Configuration {
                message: format!("JWT secret must be at least {} bytes", MIN_SECRET_LENGTH),
            });
        }
        if config.access_token_expiry <= 0 {
            return Err(DomainError::Configuration {
                message: "Access token expiry must be positive".to_string(),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: Duration::seconds(config.access_token_expiry),
        })
    }

    /// Signs an access token for `subject_id`, expiring `lifetime` after `issued_at`
    pub fn issue(
        &self,
        subject_id: Uuid,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedAccessToken, DomainError> {
        // JWT timestamps are whole seconds
        let issued_at = issued_at.trunc_subsecs(0);
        let expires_at = issued_at + self.lifetime;
        let claims = AccessTokenClaims::new(
            subject_id,
            issued_at,
            expires_at,
            &self.issuer,
            &self.audience,
        );

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to sign access token: {}", e),
            })?;

        Ok(IssuedAccessToken {
            token,
            expires_in: self.lifetime.num_seconds(),
            expires_at,
        })
    }

    /// Validates a token and extracts its subject
    ///
    /// Returns `None` for every failure: bad signature, wrong algorithm,
    /// wrong issuer or audience, missing claims, a subject that is not a
    /// UUID, or (under [`ExpiryPolicy::Enforce`]) `now >= exp`. The reason
    /// is logged at debug level only.
    pub fn validate(&self, token: &str, now: DateTime<Utc>, policy: ExpiryPolicy) -> Option<Uuid> {
        let claims = match decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
        {
            Ok(data) => data.claims,
            Err(e) => {
                tracing::debug!(reason = ?e.kind(), "Access token rejected");
                return None;
            }
        };

        if policy == ExpiryPolicy::Enforce && claims.is_expired_at(now) {
            tracing::debug!(exp = claims.exp, "Access token rejected: expired");
            return None;
        }

        match claims.user_id() {
            Ok(id) => Some(id),
            Err(_) => {
                tracing::debug!("Access token rejected: subject is not a user id");
                None
            }
        }
    }
}

impl std::fmt::Debug for AccessTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

//! Main token lifecycle service implementation

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use uuid::Uuid;

use tg_shared::utils::email::normalize_email;

use crate::domain::entities::token::{RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthResponse;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::clock::{Clock, SystemClock};
use crate::services::credentials::CredentialVerifier;
use crate::services::token::{AccessTokenCodec, RefreshTokenGenerator};

use super::config::LifecycleConfig;

/// Password hashed once and checked against when the email is unknown
const DECOY_PASSWORD: &str = "tollgate-decoy-credential";

/// Service that issues token pairs on login and rotates them on refresh
///
/// Every authentication failure of one operation is the same error value:
/// [`AuthError::InvalidCredentials`] for login, [`TokenError::InvalidToken`]
/// for refresh. Store and verifier faults surface as
/// [`DomainError::ServiceUnavailable`].
pub struct TokenLifecycleService<U, T, V, C = SystemClock>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
    C: Clock,
{
    /// User lookups
    user_repository: Arc<U>,
    /// Refresh token records
    token_repository: Arc<T>,
    /// Password checks
    verifier: Arc<V>,
    codec: AccessTokenCodec,
    generator: RefreshTokenGenerator,
    clock: Arc<C>,
    config: LifecycleConfig,
    /// Verifier-produced hash for unknown-email logins
    decoy_hash: OnceCell<String>,
}

impl<U, T, V> TokenLifecycleService<U, T, V, SystemClock>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
{
    /// Create a new lifecycle service running on wall-clock time
    ///
    /// # Arguments
    ///
    /// * `user_repository` - Source of users
    /// * `token_repository` - Store of refresh token records
    /// * `verifier` - Password checker
    /// * `codec` - Access token signer
    /// * `config` - Refresh lifetime and expiry policy
    pub fn new(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        verifier: Arc<V>,
        codec: AccessTokenCodec,
        config: LifecycleConfig,
    ) -> Self {
        Self::with_clock(
            user_repository,
            token_repository,
            verifier,
            codec,
            config,
            Arc::new(SystemClock),
        )
    }
}

impl<U, T, V, C> TokenLifecycleService<U, T, V, C>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
    C: Clock,
{
    /// Create a new lifecycle service with an explicit time source
    pub fn with_clock(
        user_repository: Arc<U>,
        token_repository: Arc<T>,
        verifier: Arc<V>,
        codec: AccessTokenCodec,
        config: LifecycleConfig,
        clock: Arc<C>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            verifier,
            codec,
            generator: RefreshTokenGenerator::new(),
            clock,
            config,
            decoy_hash: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Authenticate with email and password and issue a new token pair
    ///
    /// # Arguments
    ///
    /// * `email` - Account email, matched case-insensitively
    /// * `password` - Plain-text password
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - Access token, refresh token and profile fields
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Unknown user or wrong password
    /// * `Err(DomainError::ServiceUnavailable)` - Store or verifier failure
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, DomainError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            tracing::warn!("Login rejected: empty credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        let user = self
            .user_repository
            .find_by_email(&email)
            .await
            .map_err(|e| unavailable("user lookup", e))?;

        let user = match user {
            Some(user) => user,
            None => {
                // Pay for a verification so unknown emails cost as much as wrong passwords
                self.verify_decoy(password).await?;
                tracing::warn!("Login rejected: invalid credentials");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let verified = self
            .verifier
            .verify(password, &user.password_hash)
            .await
            .map_err(|e| unavailable("credential check", e))?;

        if !verified {
            tracing::warn!(user_id = %user.id, "Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials.into());
        }

        let now = self.clock.now();
        let access = self.codec.issue(user.id, now)?;
        let (refresh_value, record) = self.mint_refresh_token(user.id, now);
        let refresh_expires_at = record.expires_at;

        self.token_repository
            .append(record)
            .await
            .map_err(|e| unavailable("refresh token append", e))?;

        tracing::info!(user_id = %user.id, "Issued token pair on login");

        Ok(self.respond(&user, access.token, access.expires_in, refresh_value, refresh_expires_at))
    }

    /// Exchange an access token and a refresh token for a new pair
    ///
    /// The refresh token is single-use: a successful call revokes it before
    /// the replacement is handed out, and any later attempt to use it fails.
    ///
    /// # Arguments
    ///
    /// * `access_token` - Access token identifying the user; may be expired when
    ///   [`LifecycleConfig::accept_expired_access_tokens`] is set
    /// * `refresh_token` - Opaque refresh token value issued to that user
    ///
    /// # Returns
    ///
    /// * `Ok(AuthResponse)` - New access token and refresh token
    /// * `Err(DomainError::Token(TokenError::InvalidToken))` - Any rejected input
    /// * `Err(DomainError::ServiceUnavailable)` - Store failure
    pub async fn refresh(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthResponse, DomainError> {
        let now = self.clock.now();

        // Signature and claims are checked before any store access
        let user_id = match self
            .codec
            .validate(access_token, now, self.config.refresh_expiry_policy())
        {
            Some(id) if !refresh_token.is_empty() => id,
            _ => {
                tracing::warn!("Refresh rejected: access token invalid");
                return Err(TokenError::InvalidToken.into());
            }
        };

        let user = self
            .user_repository
            .find_by_id(user_id)
            .await
            .map_err(|e| unavailable("user lookup", e))?
            .ok_or_else(|| {
                tracing::warn!(user_id = %user_id, "Refresh rejected: unknown user");
                DomainError::from(TokenError::InvalidToken)
            })?;

        let token_hash = RefreshTokenGenerator::hash(refresh_token);
        let mut matches = self
            .token_repository
            .find_active(user.id, &token_hash, now)
            .await
            .map_err(|e| unavailable("refresh token lookup", e))?;

        if matches.len() > 1 {
            tracing::error!(
                user_id = %user.id,
                matches = matches.len(),
                "Integrity fault: refresh token value has several active records"
            );
            return Err(TokenError::InvalidToken.into());
        }

        let current = match matches.pop() {
            Some(record)
                if record.user_id == user.id
                    && record.token_hash == token_hash
                    && record.is_active(now) =>
            {
                record
            }
            _ => {
                tracing::warn!(user_id = %user.id, "Refresh rejected: no active refresh token");
                return Err(TokenError::InvalidToken.into());
            }
        };

        let (refresh_value, replacement) = self.mint_refresh_token(user.id, now);
        let refresh_expires_at = replacement.expires_at;

        let rotated = self
            .token_repository
            .rotate(current.id, now, replacement)
            .await
            .map_err(|e| unavailable("refresh token rotation", e))?;

        if !rotated {
            tracing::warn!(
                user_id = %user.id,
                token_id = %current.id,
                "Refresh rejected: token already redeemed"
            );
            return Err(TokenError::InvalidToken.into());
        }

        let access = self.codec.issue(user.id, now)?;

        tracing::info!(
            user_id = %user.id,
            revoked_token_id = %current.id,
            "Rotated refresh token"
        );

        Ok(self.respond(&user, access.token, access.expires_in, refresh_value, refresh_expires_at))
    }

    /// Runs one verification against the decoy hash, discarding the outcome
    async fn verify_decoy(&self, password: &str) -> Result<(), DomainError> {
        let decoy_hash = self
            .decoy_hash
            .get_or_try_init(|| self.verifier.hash(DECOY_PASSWORD))
            .await
            .map_err(|e| unavailable("credential check", e))?;

        self.verifier
            .verify(password, decoy_hash)
            .await
            .map_err(|e| unavailable("credential check", e))?;
        Ok(())
    }

    /// New refresh value and the record that stores its digest
    fn mint_refresh_token(&self, user_id: Uuid, now: DateTime<Utc>) -> (String, RefreshToken) {
        let value = self.generator.generate();
        let record = RefreshToken::new(
            user_id,
            RefreshTokenGenerator::hash(&value),
            now,
            self.config.refresh_token_lifetime,
        );
        (value, record)
    }

    fn respond(
        &self,
        user: &User,
        access_token: String,
        expires_in: i64,
        refresh_token: String,
        refresh_token_expires_at: DateTime<Utc>,
    ) -> AuthResponse {
        let pair = TokenPair {
            access_token,
            expires_in,
            refresh_token,
            refresh_token_expires_at,
        };
        AuthResponse::from_token_pair(pair, user)
    }
}

/// Logs a collaborator fault and converts it to `ServiceUnavailable`
fn unavailable(operation: &str, error: DomainError) -> DomainError {
    tracing::error!(operation, error = %error, "Collaborator failure");
    DomainError::ServiceUnavailable {
        message: format!("{} failed", operation),
    }
}

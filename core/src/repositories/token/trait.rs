//! Token repository trait defining the interface for refresh token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

/// Repository trait for a user's refresh token records
///
/// # Consistency requirements
/// - `token_hash` values are unique across all users; `append` rejects a duplicate.
/// - `mark_revoked` is a conditional write: of two concurrent calls for the
///   same record exactly one returns `true`.
/// - `rotate` revokes before it appends. Stores with transactions should
///   override it so both writes commit together.
/// - Records are never deleted by the lifecycle service.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Append a new refresh token to its owner's collection
    ///
    /// # Returns
    /// * `Ok(RefreshToken)` - The stored record
    /// * `Err(DomainError::Validation)` - A record with the same hash already exists
    /// * `Err(DomainError)` - Store failure
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use uuid::Uuid;
    /// # use tg_core::repositories::TokenRepository;
    /// # use tg_core::domain::entities::token::RefreshToken;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let token = RefreshToken::new(
    ///     Uuid::new_v4(),
    ///     "sha256_hex_of_value".to_string(),
    ///     Utc::now(),
    ///     Duration::days(14),
    /// );
    ///
    /// let saved = repo.append(token).await?;
    /// println!("Token saved with ID: {}", saved.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn append(&self, token: RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find the user's records with the given hash that are active at `now`
    ///
    /// A healthy store returns zero or one record. More than one is an
    /// integrity fault that the caller reports.
    async fn find_active(
        &self,
        user_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError>;

    /// Set `revoked_at` on a record that is not yet revoked
    ///
    /// # Returns
    /// * `Ok(true)` - This call revoked the record
    /// * `Ok(false)` - Record missing or already revoked
    /// * `Err(DomainError)` - Store failure
    async fn mark_revoked(
        &self,
        token_id: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError>;

    /// Revoke `revoked_id` and append `replacement` as one unit of work
    ///
    /// The default implementation performs the revocation first and only
    /// appends once it has succeeded, so a failure between the two writes
    /// never leaves a consumed token usable.
    ///
    /// # Returns
    /// * `Ok(true)` - Old record revoked and replacement stored
    /// * `Ok(false)` - Old record was already revoked; nothing was appended
    async fn rotate(
        &self,
        revoked_id: Uuid,
        revoked_at: DateTime<Utc>,
        replacement: RefreshToken,
    ) -> Result<bool, DomainError> {
        if !self.mark_revoked(revoked_id, revoked_at).await? {
            return Ok(false);
        }
        self.append(replacement).await?;
        Ok(true)
    }

    /// All records owned by a user, in every state, oldest first
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError>;

    /// Count the user's records that are active at `now`
    async fn count_active(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<usize, DomainError> {
        let tokens = self.find_by_user(user_id).await?;
        Ok(tokens.iter().filter(|t| t.is_active(now)).count())
    }
}

//! MySQL implementation of the TokenRepository trait.
//!
//! Records are stored one row per refresh token. Only the SHA-256 digest of
//! the token value is persisted. Rotation runs in a single transaction that
//! locks the row being revoked.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tg_core::domain::entities::token::RefreshToken;
use tg_core::errors::DomainError;
use tg_core::repositories::TokenRepository;

use super::{is_unique_violation, store_error};

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, token_hash, created_at, expires_at, revoked_at FROM refresh_tokens";

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> Result<RefreshToken, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| store_error("Failed to get id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| store_error("Failed to get user_id", e))?;

        Ok(RefreshToken {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid token UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
                message: format!("Invalid user UUID: {}", e),
            })?,
            token_hash: row
                .try_get("token_hash")
                .map_err(|e| store_error("Failed to get token_hash", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| store_error("Failed to get created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| store_error("Failed to get expires_at", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| store_error("Failed to get revoked_at", e))?,
        })
    }

    fn insert_error(e: sqlx::Error) -> DomainError {
        if is_unique_violation(&e) {
            DomainError::Validation {
                message: "Token already exists".to_string(),
            }
        } else {
            store_error("Failed to save refresh token", e)
        }
    }
}

const INSERT_TOKEN: &str = r#"
    INSERT INTO refresh_tokens (id, user_id, token_hash, created_at, expires_at, revoked_at)
    VALUES (?, ?, ?, ?, ?, ?)
"#;

const REVOKE_TOKEN: &str = r#"
    UPDATE refresh_tokens
    SET revoked_at = ?
    WHERE id = ? AND revoked_at IS NULL
"#;

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn append(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        sqlx::query(INSERT_TOKEN)
            .bind(token.id.to_string())
            .bind(token.user_id.to_string())
            .bind(&token.token_hash)
            .bind(token.created_at)
            .bind(token.expires_at)
            .bind(token.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(Self::insert_error)?;

        Ok(token)
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!(
            "{} WHERE user_id = ? AND token_hash = ? AND revoked_at IS NULL AND expires_at > ?",
            SELECT_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .bind(token_hash)
            .bind(now)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to find refresh token", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn mark_revoked(
        &self,
        token_id: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(REVOKE_TOKEN)
            .bind(revoked_at)
            .bind(token_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to revoke refresh token", e))?;

        Ok(result.rows_affected() == 1)
    }

    async fn rotate(
        &self,
        revoked_id: Uuid,
        revoked_at: DateTime<Utc>,
        replacement: RefreshToken,
    ) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("Failed to begin transaction", e))?;

        // Lock the row so a concurrent rotation waits for this one to finish
        let locked = sqlx::query("SELECT revoked_at FROM refresh_tokens WHERE id = ? FOR UPDATE")
            .bind(revoked_id.to_string())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to lock refresh token", e))?;

        if locked.is_none() {
            tx.rollback()
                .await
                .map_err(|e| store_error("Failed to roll back", e))?;
            return Ok(false);
        }

        let revoked = sqlx::query(REVOKE_TOKEN)
            .bind(revoked_at)
            .bind(revoked_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| store_error("Failed to revoke refresh token", e))?;

        if revoked.rows_affected() != 1 {
            tx.rollback()
                .await
                .map_err(|e| store_error("Failed to roll back", e))?;
            return Ok(false);
        }

        sqlx::query(INSERT_TOKEN)
            .bind(replacement.id.to_string())
            .bind(replacement.user_id.to_string())
            .bind(&replacement.token_hash)
            .bind(replacement.created_at)
            .bind(replacement.expires_at)
            .bind(replacement.revoked_at)
            .execute(&mut *tx)
            .await
            .map_err(Self::insert_error)?;

        tx.commit()
            .await
            .map_err(|e| store_error("Failed to commit rotation", e))?;

        Ok(true)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let query = format!("{} WHERE user_id = ? ORDER BY created_at ASC", SELECT_COLUMNS);

        let rows = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("Failed to list refresh tokens", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }
}

//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshToken;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Mock token repository that counts calls and can simulate an outage
///
/// Records are kept in a plain vector so tests can seed states a real store
/// would refuse, such as two records sharing one hash.
pub struct MockTokenRepository {
    tokens: Arc<RwLock<Vec<RefreshToken>>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Vec::new())),
            calls: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Insert a record without any uniqueness check
    pub async fn seed(&self, token: RefreshToken) {
        self.tokens.write().await.push(token);
    }

    /// Snapshot of every stored record
    pub async fn all(&self) -> Vec<RefreshToken> {
        self.tokens.read().await.clone()
    }

    /// Number of repository calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent call fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::Internal {
                message: "token store offline".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn append(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        self.enter()?;
        let mut tokens = self.tokens.write().await;

        if tokens.iter().any(|t| t.token_hash == token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        tokens.push(token.clone());
        Ok(token)
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        self.enter()?;
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .filter(|t| t.user_id == user_id && t.token_hash == token_hash && t.is_active(now))
            .cloned()
            .collect())
    }

    async fn mark_revoked(
        &self,
        token_id: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        self.enter()?;
        let mut tokens = self.tokens.write().await;
        Ok(tokens
            .iter_mut()
            .find(|t| t.id == token_id)
            .map(|t| t.revoke(revoked_at))
            .unwrap_or(false))
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        self.enter()?;
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().filter(|t| t.user_id == user_id).cloned().collect())
    }
}

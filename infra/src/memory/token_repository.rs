use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use tg_core::domain::entities::token::RefreshToken;
use tg_core::errors::DomainError;
use tg_core::repositories::TokenRepository;

#[derive(Default)]
struct TokenTable {
    /// Each user's record collection, in issue order
    by_user: HashMap<Uuid, Vec<RefreshToken>>,
    /// Record id to owner
    owners: HashMap<Uuid, Uuid>,
    /// Every digest ever stored
    hashes: HashSet<String>,
}

impl TokenTable {
    fn insert(&mut self, token: RefreshToken) -> Result<(), DomainError> {
        if self.hashes.contains(&token.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }
        self.hashes.insert(token.token_hash.clone());
        self.owners.insert(token.id, token.user_id);
        self.by_user.entry(token.user_id).or_default().push(token);
        Ok(())
    }

    fn get_mut(&mut self, token_id: Uuid) -> Option<&mut RefreshToken> {
        let owner = self.owners.get(&token_id)?;
        self.by_user
            .get_mut(owner)?
            .iter_mut()
            .find(|t| t.id == token_id)
    }
}

/// In-memory refresh token store, grouped per user
#[derive(Default)]
pub struct InMemoryTokenRepository {
    table: RwLock<TokenTable>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn append(&self, token: RefreshToken) -> Result<RefreshToken, DomainError> {
        let mut table = self.table.write().await;
        table.insert(token.clone())?;
        Ok(token)
    }

    async fn find_active(
        &self,
        user_id: Uuid,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<RefreshToken>, DomainError> {
        let table = self.table.read().await;
        Ok(table
            .by_user
            .get(&user_id)
            .map(|tokens| {
                tokens
                    .iter()
                    .filter(|t| t.token_hash == token_hash && t.is_active(now))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn mark_revoked(
        &self,
        token_id: Uuid,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;
        Ok(table
            .get_mut(token_id)
            .map(|t| t.revoke(revoked_at))
            .unwrap_or(false))
    }

    async fn rotate(
        &self,
        revoked_id: Uuid,
        revoked_at: DateTime<Utc>,
        replacement: RefreshToken,
    ) -> Result<bool, DomainError> {
        let mut table = self.table.write().await;

        // Reject a clashing replacement before touching the old record
        if table.hashes.contains(&replacement.token_hash) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        let revoked = table
            .get_mut(revoked_id)
            .map(|t| t.revoke(revoked_at))
            .unwrap_or(false);
        if !revoked {
            return Ok(false);
        }

        table.insert(replacement)?;
        Ok(true)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, DomainError> {
        let table = self.table.read().await;
        Ok(table.by_user.get(&user_id).cloned().unwrap_or_default())
    }
}

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use tg_core::domain::entities::user::User;
use tg_core::errors::DomainError;
use tg_core::repositories::UserRepository;
use tg_core::services::CredentialVerifier;
use tg_shared::config::auth::SeedUserConfig;
use tg_shared::utils::email::{is_valid_email, normalize_email};

/// In-memory user store keyed by id
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user from seed configuration, hashing the password with `verifier`
    ///
    /// # Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DomainError::Validation)` - Malformed or already registered email
    pub async fn seed<V: CredentialVerifier>(
        &self,
        seed: &SeedUserConfig,
        verifier: &V,
    ) -> Result<User, DomainError> {
        if !is_valid_email(&seed.email) {
            return Err(DomainError::Validation {
                message: "Seed user email is not a valid address".to_string(),
            });
        }

        let password_hash = verifier.hash(&seed.password).await?;
        let user = User::new(
            &seed.email,
            seed.first_name.clone(),
            seed.last_name.clone(),
            password_hash,
        );
        let user = self.create(user).await?;

        tracing::info!(user_id = %user.id, "Seeded user into in-memory store");
        Ok(user)
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, mut user: User) -> Result<User, DomainError> {
        user.email = normalize_email(&user.email);

        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(DomainError::Validation {
                message: "Email already registered".to_string(),
            });
        }
        if users.contains_key(&user.id) {
            return Err(DomainError::Validation {
                message: "User already exists".to_string(),
            });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

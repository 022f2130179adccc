//! bcrypt-backed password verification

use async_trait::async_trait;

use tg_core::errors::DomainError;
use tg_core::services::CredentialVerifier;

/// Verifies passwords against bcrypt hashes
///
/// Hashing and verification are CPU-bound, so both run on tokio's blocking
/// thread pool instead of the async workers.
#[derive(Debug, Clone, Copy)]
pub struct BcryptCredentialVerifier {
    cost: u32,
}

impl BcryptCredentialVerifier {
    /// Create a verifier that hashes with the given work factor
    ///
    /// # Arguments
    /// * `cost` - bcrypt cost, between 4 and 31
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptCredentialVerifier {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

#[async_trait]
impl CredentialVerifier for BcryptCredentialVerifier {
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, DomainError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password verification task failed: {}", e),
            })?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                // An unreadable stored hash can never match
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                Ok(false)
            }
        }
    }

    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Password hashing task failed: {}", e),
            })?
            .map_err(|e| DomainError::Internal {
                message: format!("Failed to hash password: {}", e),
            })
    }
}

//! Credential verification interface

use async_trait::async_trait;

use crate::errors::DomainError;

/// Checks submitted passwords against stored credential hashes
///
/// The core never inspects a hash itself; it only asks this collaborator for
/// a yes/no answer.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Check a password against a stored hash
    ///
    /// # Returns
    /// * `Ok(true)` - Password matches
    /// * `Ok(false)` - Password does not match, or the hash is not one this verifier understands
    /// * `Err(DomainError)` - The verifier itself failed
    async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, DomainError>;

    /// Produce a hash suitable for storing on a new user
    async fn hash(&self, password: &str) -> Result<String, DomainError>;
}

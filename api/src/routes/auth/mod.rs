//! Authentication route handlers
//!
//! - `login` exchanges email and password for a token pair
//! - `refresh` exchanges a token pair for a new one

pub mod login;
pub mod refresh;

use std::sync::Arc;

use tg_core::repositories::{TokenRepository, UserRepository};
use tg_core::services::{Clock, CredentialVerifier, SystemClock, TokenLifecycleService};

/// Application state that holds shared services
pub struct AppState<U, T, V, C = SystemClock>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
    C: Clock,
{
    pub lifecycle: Arc<TokenLifecycleService<U, T, V, C>>,
}

impl<U, T, V, C> AppState<U, T, V, C>
where
    U: UserRepository,
    T: TokenRepository,
    V: CredentialVerifier,
    C: Clock,
{
    pub fn new(lifecycle: Arc<TokenLifecycleService<U, T, V, C>>) -> Self {
        Self { lifecycle }
    }
}

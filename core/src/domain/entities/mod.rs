//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    AccessTokenClaims, RefreshToken, RefreshTokenState, TokenPair,
    DEFAULT_ACCESS_TOKEN_EXPIRY_SECONDS, DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
};
pub use user::User;

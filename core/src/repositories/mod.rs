//! Repository interfaces forming the token store contract.
//!
//! The lifecycle service reaches persistent state only through these
//! traits; concrete stores live in the infrastructure crate.

pub mod token;
pub mod user;

pub use token::TokenRepository;
pub use user::UserRepository;

#[cfg(test)]
pub use token::MockTokenRepository;
#[cfg(test)]
pub use user::MockUserRepository;

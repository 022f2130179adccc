//! Process-local stores
//!
//! State lives behind a `tokio::sync::RwLock` and is lost on restart. Every
//! write, including the revoke-and-append of a rotation, happens under one
//! write guard, which makes concurrent redemptions of one token serialize.

mod token_repository;
mod user_repository;


pub use token_repository::InMemoryTokenRepository;
pub use user_repository::InMemoryUserRepository;

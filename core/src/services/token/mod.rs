//! Access token codec and refresh token generator
//!
//! Both are stateless and perform no I/O:
//! - `AccessTokenCodec` signs and validates HS256 access tokens
//! - `RefreshTokenGenerator` mints opaque refresh token values and their storage digests

mod codec;
mod generator;


pub use codec::{AccessTokenCodec, ExpiryPolicy, IssuedAccessToken};
pub use generator::{RefreshTokenGenerator, REFRESH_TOKEN_BYTES};

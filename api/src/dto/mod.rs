//! Request bodies accepted by the API

pub mod auth_dto;

pub use auth_dto::{LoginRequest, RefreshTokenRequest};

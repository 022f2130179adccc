//! Credential verifier implementations

mod bcrypt_verifier;

pub use bcrypt_verifier::BcryptCredentialVerifier;

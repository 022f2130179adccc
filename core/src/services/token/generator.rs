//! Opaque refresh token values

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};

/// Bytes of entropy in every refresh token value
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// Generates refresh token values and the digests they are stored under
#[derive(Debug, Clone, Copy, Default)]
pub struct RefreshTokenGenerator;

impl RefreshTokenGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Draws 64 bytes from the OS CSPRNG and encodes them as unpadded URL-safe base64
    pub fn generate(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Hex SHA-256 digest of a token value
    pub fn hash(value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

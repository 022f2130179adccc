//! Business services containing domain logic and use cases.

pub mod clock;
pub mod credentials;
pub mod lifecycle;
pub mod token;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use credentials::CredentialVerifier;
pub use lifecycle::{LifecycleConfig, TokenLifecycleService};
pub use token::{AccessTokenCodec, ExpiryPolicy, IssuedAccessToken, RefreshTokenGenerator};

//! Security headers for API responses.
//!
//! Token responses must never be cached or framed, so every response gets:
//! - `Cache-Control: no-store` and `Pragma: no-cache`
//! - `X-Content-Type-Options: nosniff`
//! - `X-Frame-Options: DENY`
//! - `Strict-Transport-Security` when running in production

use actix_web::middleware::DefaultHeaders;

use tg_shared::config::Environment;

/// Build the header middleware for the given environment
pub fn security_headers(environment: Environment) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add(("Cache-Control", "no-store"))
        .add(("Pragma", "no-cache"))
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"));

    if environment.is_production() {
        headers.add(("Strict-Transport-Security", "max-age=31536000; includeSubDomains"))
    } else {
        headers
    }
}

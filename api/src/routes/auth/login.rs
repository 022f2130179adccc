use actix_web::{web, HttpResponse};
use validator::Validate;

use tg_core::repositories::{TokenRepository, UserRepository};
use tg_core::services::{Clock, CredentialVerifier};

use crate::dto::auth_dto::LoginRequest;
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/auth/login
///
/// # Request Body
///
/// ```json
/// {
///     "email": "a@x.com",
///     "password": "correct"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "id": "5f0c...",
///     "email": "a@x.com",
///     "firstName": "Ada",
///     "lastName": "Lovelace",
///     "token": "eyJ...",
///     "expiresIn": 900,
///     "refreshToken": "q3N...",
///     "refreshTokenExpiration": "2024-01-15T09:00:00Z"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed body or invalid email format
/// - 401 Unauthorized: Unknown email or wrong password (same body for both)
/// - 503 Service Unavailable: User store or credential check unavailable
pub async fn login<U, T, V, C>(
    state: web::Data<AppState<U, T, V, C>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier + 'static,
    C: Clock + 'static,
{
    if let Err(errors) = request.validate() {
        tracing::debug!("Login request failed validation");
        return handle_validation_errors(&errors);
    }

    match state.lifecycle.login(&request.email, &request.password).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}

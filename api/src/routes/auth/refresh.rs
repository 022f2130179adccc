use actix_web::{web, HttpResponse};
use validator::Validate;

use tg_core::repositories::{TokenRepository, UserRepository};
use tg_core::services::{Clock, CredentialVerifier};

use crate::dto::auth_dto::RefreshTokenRequest;
use crate::handlers::error_handler::{handle_domain_error, handle_validation_errors};

use super::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges an access token and its refresh token for a new pair. The
/// submitted refresh token is revoked and cannot be used again.
///
/// # Request Body
///
/// ```json
/// {
///     "token": "eyJ...",
///     "refreshToken": "q3N..."
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// Same shape as the login response.
///
/// ## Errors
/// - 401 Unauthorized: Any invalid, expired, revoked or mismatched token
/// - 503 Service Unavailable: Token store unavailable
pub async fn refresh<U, T, V, C>(
    state: web::Data<AppState<U, T, V, C>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier + 'static,
    C: Clock + 'static,
{
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors);
    }

    match state
        .lifecycle
        .refresh(&request.token, &request.refresh_token)
        .await
    {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(error) => handle_domain_error(error),
    }
}

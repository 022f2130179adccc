//! Application factory
//!
//! Builds the Actix-web application around a shared `AppState`.

use actix_web::{middleware::Logger, web, App, HttpResponse};

use tg_core::repositories::{TokenRepository, UserRepository};
use tg_core::services::{Clock, CredentialVerifier};
use tg_shared::config::Environment;
use tg_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::error_handler::json_config;
use crate::middleware::security_headers;
use crate::routes::auth::{login::login, refresh::refresh, AppState};
use crate::routes::health::health_check;

/// Create and configure the application with all dependencies
pub fn create_app<U, T, V, C>(
    app_state: web::Data<AppState<U, T, V, C>>,
    environment: Environment,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
    V: CredentialVerifier + 'static,
    C: Clock + 'static,
{
    App::new()
        .app_data(app_state)
        .app_data(json_config())
        // Logging wraps everything, headers are added to every response
        .wrap(security_headers(environment))
        .wrap(Logger::new("%a \"%r\" %s %b %Dms"))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<U, T, V, C>))
                    .route("/refresh", web::post().to(refresh::<U, T, V, C>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

//! Conversion of domain and request errors into HTTP responses

use actix_web::{error::InternalError, web, HttpResponse};
use validator::ValidationErrors;

use tg_core::errors::{AuthError, DomainError, TokenError};
use tg_shared::errors::{error_codes, ErrorResponse};

/// Largest accepted JSON body in bytes
const MAX_JSON_BODY: usize = 16 * 1024;

/// Handle domain errors and convert them to appropriate HTTP responses
///
/// Authentication failures carry a fixed code and message and no timestamp,
/// so every failure of one operation produces the same body.
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(AuthError::InvalidCredentials) => {
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::INVALID_CREDENTIALS,
                AuthError::InvalidCredentials.to_string(),
            ))
        }
        DomainError::Token(TokenError::InvalidToken) => {
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::INVALID_TOKEN,
                TokenError::InvalidToken.to_string(),
            ))
        }
        DomainError::Validation { message } => HttpResponse::BadRequest()
            .json(ErrorResponse::new(error_codes::VALIDATION_ERROR, message).with_timestamp()),
        DomainError::ServiceUnavailable { message } => {
            tracing::error!(error = %message, "Request failed: collaborator unavailable");
            HttpResponse::ServiceUnavailable().json(
                ErrorResponse::new(
                    error_codes::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable, please retry later",
                )
                .with_timestamp(),
            )
        }
        DomainError::Configuration { message } | DomainError::Internal { message } => {
            tracing::error!(error = %message, "Request failed: internal error");
            HttpResponse::InternalServerError().json(
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "An internal error occurred")
                    .with_timestamp(),
            )
        }
    }
}

/// 400 response listing the fields that failed validation
pub fn handle_validation_errors(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request data");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field.to_string(), messages);
    }

    HttpResponse::BadRequest().json(response.with_timestamp())
}

/// JSON extractor configuration that answers malformed bodies with a 400 `ErrorResponse`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_JSON_BODY)
        .error_handler(|err, _req| {
            tracing::debug!(error = %err, "Rejected request body");
            let response = HttpResponse::BadRequest().json(
                ErrorResponse::new(error_codes::BAD_REQUEST, "Malformed request body")
                    .with_timestamp(),
            );
            InternalError::from_response(err, response).into()
        })
}

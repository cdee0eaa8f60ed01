//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can hit, from malformed input to a denied ownership check,
//! is one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers, extractors and
//! the authentication middleware can all return it and get a consistent JSON body:
//! `{"message": "..."}`, plus an `"errors"` array for validation failures.
//! It also provides `From` trait implementations for `sqlx::Error`,
//! `validator::ValidationErrors`, `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError`,
//! allowing for easy conversion using the `?` operator.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message returned for every 500, whatever the underlying cause.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400). Carries every violated rule.
    ValidationError(Vec<String>),
    /// The resource would duplicate an existing one, e.g. a registered email (HTTP 400).
    Conflict(String),
    /// Login failed. Deliberately does not say whether the email or the password was wrong (HTTP 401).
    InvalidCredentials,
    /// Missing, malformed or expired bearer token (HTTP 401).
    Unauthorized(String),
    /// Authenticated, but not allowed to touch the resource (HTTP 403).
    Forbidden(String),
    /// Represents a situation where a requested resource was not found (HTTP 404).
    NotFound(String),
    /// Represents an unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// Represents an error originating from the persistent store (HTTP 500).
    DatabaseError(String),
}

impl AppError {
    /// Shorthand for a validation failure with a single message.
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![message.into()])
    }

    fn message(&self) -> String {
        match self {
            AppError::ValidationError(_) => "Validation failed".to_string(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                write!(f, "Validation Error: {}", errors.join("; "))
            }
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InvalidCredentials => write!(f, "Unauthorized: Invalid credentials"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// Internal and database errors are logged here and rendered with a generic
/// message so nothing about the failure leaks to the client.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => json!({
                "message": self.message(),
                "errors": errors,
            }),
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                log::error!("{}", self);
                json!({ "message": self.message() })
            }
            _ => json!({ "message": self.message() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Unique-constraint violations become `AppError::Conflict` (the only unique
/// column is the user email); everything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Email already registered".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Every field error becomes one human-readable message. Messages are ordered
/// by field name so responses are stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let messages = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => default_message(field, &err.code),
                })
            })
            .collect();
        AppError::ValidationError(messages)
    }
}

fn default_message(field: &str, code: &str) -> String {
    let mut chars = field.chars();
    let label: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    match code {
        "required" | "blank" => format!("{} is required", label),
        _ => format!("{} is invalid", label),
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
///
/// Expiry gets its own message; every other decoding failure is reported as
/// an invalid token without further detail.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token expired".into())
            }
            _ => AppError::Unauthorized("Invalid token".into()),
        }
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::ValidationError;

    async fn body_json(error: AppError) -> serde_json::Value {
        let response = error.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::validation("bad").error_response().status(), 400);
        assert_eq!(AppError::Conflict("dup".into()).error_response().status(), 400);
        assert_eq!(AppError::InvalidCredentials.error_response().status(), 401);
        assert_eq!(AppError::Unauthorized("Missing token".into()).error_response().status(), 401);
        assert_eq!(AppError::Forbidden("Not allowed".into()).error_response().status(), 403);
        assert_eq!(AppError::NotFound("Task not found".into()).error_response().status(), 404);
        assert_eq!(AppError::InternalServerError("boom".into()).error_response().status(), 500);
        assert_eq!(AppError::DatabaseError("pool closed".into()).error_response().status(), 500);
    }

    #[actix_rt::test]
    async fn test_internal_errors_do_not_leak_details() {
        let body = body_json(AppError::DatabaseError("relation \"users\" does not exist".into())).await;
        assert_eq!(body, json!({ "message": "Internal server error" }));
    }

    #[actix_rt::test]
    async fn test_validation_body_lists_every_error() {
        let body = body_json(AppError::ValidationError(vec![
            "Name is required".into(),
            "Valid email is required".into(),
        ]))
        .await;
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"], json!(["Name is required", "Valid email is required"]));
    }

    #[test]
    fn test_validation_errors_conversion_is_ordered_and_labelled() {
        let mut errors = ValidationErrors::new();
        errors.add("title", ValidationError::new("required"));
        let mut with_message = ValidationError::new("regex");
        with_message.message = Some("Valid email is required".into());
        errors.add("email", with_message);

        match AppError::from(errors) {
            AppError::ValidationError(messages) => assert_eq!(
                messages,
                vec!["Valid email is required".to_string(), "Title is required".to_string()]
            ),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_jwt_errors_map_to_unauthorized() {
        let expired: jsonwebtoken::errors::Error =
            jsonwebtoken::errors::ErrorKind::ExpiredSignature.into();
        assert!(matches!(AppError::from(expired), AppError::Unauthorized(msg) if msg == "Token expired"));

        let bad: jsonwebtoken::errors::Error = jsonwebtoken::errors::ErrorKind::InvalidSignature.into();
        assert!(matches!(AppError::from(bad), AppError::Unauthorized(msg) if msg == "Invalid token"));
    }
}

//! Authentication Error Types
//!
//! Centralized error handling for all authentication operations. Lower-level
//! failures (storage, hashing, token crypto) are classified into this taxonomy
//! before they reach the transport boundary; clients only ever see a stable
//! machine-readable reason plus a human-readable message.

use crate::store::StoreError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Authentication errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already registered")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No credential presented")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error")]
    Internal,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            AuthError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                msg.clone(),
            ),
            AuthError::Conflict => (
                StatusCode::CONFLICT,
                "email_exists",
                "User with this email already exists".to_string(),
            ),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                self.to_string(),
            ),
            // A missing credential and a bad one are distinct variants for
            // logging, but indistinguishable on the wire.
            AuthError::Unauthenticated | AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "Authentication required".to_string(),
            ),
            AuthError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "user_not_found",
                self.to_string(),
            ),
            AuthError::Storage(_) | AuthError::Config(_) | AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "error": error_code,
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AuthError::Conflict,
            StoreError::Unavailable(msg) => AuthError::Storage(msg),
        }
    }
}

impl From<argon2::password_hash::Error> for AuthError {
    fn from(err: argon2::password_hash::Error) -> Self {
        tracing::error!("Password hashing error: {:?}", err);
        AuthError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_classification() {
        assert!(matches!(
            AuthError::from(StoreError::DuplicateEmail),
            AuthError::Conflict
        ));
        assert!(matches!(
            AuthError::from(StoreError::Unavailable("down".into())),
            AuthError::Storage(_)
        ));
    }

    #[test]
    fn test_missing_and_bad_credential_share_status() {
        let missing = AuthError::Unauthenticated.into_response();
        let bad = AuthError::InvalidToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_storage_maps_to_500() {
        let response = AuthError::Storage("connection refused to 10.0.0.5".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

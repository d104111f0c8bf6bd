//! Authentication Models
//!
//! Data structures for authentication requests, responses, and database
//! entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ============================================
// Database Entities
// ============================================

/// Credential record persisted by the credential store
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: String,
    pub age: Option<i32>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new credential record. The email is expected to be
/// normalized (lowercased) and the password already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub display_name: Option<String>,
    pub email: String,
    pub age: Option<i32>,
    pub password_hash: String,
}

/// Identity resolved by the authentication gate, attached to the request
/// context for the duration of its processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: Uuid,
    pub email: String,
}

impl AuthIdentity {
    pub fn of(user: &User) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
        }
    }
}

// ============================================
// Request DTOs
// ============================================

/// Registration request.
///
/// `Username` is accepted as an alias for compatibility with existing form
/// clients. Email and password are defaulted so an absent field fails request
/// validation (400) rather than body deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default, alias = "Username")]
    #[validate(length(max = 100, message = "Username must be at most 100 characters"))]
    pub username: Option<String>,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================
// Response DTOs
// ============================================

/// Public user data without sensitive fields
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: String,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            age: user.age,
            created_at: user.created_at,
        }
    }
}

/// Simple message response
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================
// JWT Claims
// ============================================

/// Claims embedded in bearer tokens. The signature covers the whole payload,
/// expiry included, so the expiry cannot be tampered with independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_accepts_legacy_username_key() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"Username":"alice","email":"a@b.com","age":30,"password":"secret1"}"#,
        )
        .unwrap();
        assert_eq!(req.username.as_deref(), Some("alice"));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_register_request_missing_password_fails_validation() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@b.com"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_login_request_missing_email_fails_validation() {
        let req: LoginRequest = serde_json::from_str(r#"{"password":"x"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_user_serialization_skips_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            display_name: Some("alice".into()),
            email: "a@b.com".into(),
            age: Some(30),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}

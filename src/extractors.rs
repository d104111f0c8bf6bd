//! Request Extractors
//!
//! Axum extractor for the identity resolved by the authentication gate.

use crate::error::AuthError;
use crate::models::AuthIdentity;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

#[async_trait]
impl<S> FromRequestParts<S> for AuthIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthIdentity>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("AuthIdentity missing from request extensions; route is not behind the gate");
                AuthError::Unauthenticated
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_extracts_identity_from_extensions() {
        let identity = AuthIdentity {
            user_id: Uuid::new_v4(),
            email: "a@b.com".into(),
        };

        let mut request = Request::builder().uri("/dashboard").body(()).unwrap();
        request.extensions_mut().insert(identity.clone());
        let (mut parts, _) = request.into_parts();

        let extracted = AuthIdentity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, identity);
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthenticated() {
        let request = Request::builder().uri("/dashboard").body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let err = AuthIdentity::from_request_parts(&mut parts, &()).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }
}

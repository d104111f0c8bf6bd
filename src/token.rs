//! Bearer Token Issuer and Verifier
//!
//! Stateless HMAC-signed tokens carrying the authenticated identity and an
//! absolute expiry. Validity is entirely a function of signature and expiry;
//! nothing is persisted server-side, and individual tokens cannot be revoked.
//! Rotating the signing secret invalidates every outstanding token at once
//! (documented limitation, not a bug).

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::{AuthIdentity, TokenClaims};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

/// Issuer claim embedded in every token
const ISSUER: &str = "authgate";

/// Why a token failed verification. Callers reject either way; the
/// distinction exists for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
}

/// Signs and validates stateless bearer tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: i64,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl: config.token_ttl,
        }
    }

    /// Issue a token for an identity with the configured default ttl
    pub fn issue(&self, identity: &AuthIdentity) -> Result<String, AuthError> {
        self.issue_with_ttl(identity, self.ttl)
    }

    /// Issue a token expiring `ttl_secs` from now
    pub fn issue_with_ttl(
        &self,
        identity: &AuthIdentity,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs);

        let claims = TokenClaims {
            sub: identity.user_id,
            email: identity.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: ISSUER.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!("Token signing failed: {:?}", err);
            AuthError::Internal
        })
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// An expired-but-authentic token reports `Expired`; anything else
    /// (parse failure, bad signature, wrong issuer) reports `Malformed`.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[ISSUER]);
        // No clock leeway: an expiry in the past is expired, full stop.
        validation.leeway = 0;

        let token_data =
            decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|err| {
                match err.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                }
            })?;

        // The library only rejects once exp < now, which leaves a token with
        // exp == now accepted for up to a second. An expiry that is not in
        // the future is expired.
        if token_data.claims.exp <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(token_data.claims)
    }
}

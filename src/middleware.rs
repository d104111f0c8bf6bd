//! Authentication Gate
//!
//! Per-request identity resolution in strict order: server-side session
//! first (cheap, revocable, the browser path), bearer token second (the API
//! path), otherwise reject. The gate never merges partial identity from both
//! sources; whichever source resolves first wins outright.

use crate::error::AuthError;
use crate::models::AuthIdentity;
use crate::session::SessionStore;
use crate::token::{TokenError, TokenIssuer};
use crate::AppState;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "sid";

/// Why the gate turned a request away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    /// No usable credential was presented
    NoCredential,
    /// A bearer token was presented and failed verification
    BadToken(TokenError),
}

/// Gate outcome as an explicit tagged result, so callers cannot forget the
/// rejection path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    Accepted(AuthIdentity),
    Rejected(GateRejection),
}

/// Resolve a caller's identity from an optional session id and an optional
/// bearer token.
///
/// A session id that fails to resolve (unknown, tampered, expired) simply
/// falls through to the token check; only an attempted-and-failed token
/// verification is reported as `BadToken`.
pub async fn resolve_identity(
    sessions: &SessionStore,
    tokens: &TokenIssuer,
    session_id: Option<&str>,
    bearer: Option<&str>,
) -> GateOutcome {
    if let Some(sid) = session_id {
        if let Some(identity) = sessions.resolve(sid).await {
            return GateOutcome::Accepted(identity);
        }
    }

    match bearer {
        Some(token) => match tokens.verify(token) {
            Ok(claims) => GateOutcome::Accepted(AuthIdentity {
                user_id: claims.sub,
                email: claims.email,
            }),
            Err(err) => GateOutcome::Rejected(GateRejection::BadToken(err)),
        },
        None => GateOutcome::Rejected(GateRejection::NoCredential),
    }
}

/// Require an authenticated caller.
///
/// On acceptance the resolved [`AuthIdentity`] is attached to the request
/// extensions for handlers and extractors. Both rejection reasons produce the
/// same external 401; the distinction only reaches the logs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let session_id = cookie_value(request.headers(), SESSION_COOKIE);
    let bearer = bearer_token(request.headers());

    let outcome = resolve_identity(
        &state.sessions,
        &state.tokens,
        session_id.as_deref(),
        bearer.as_deref(),
    )
    .await;

    match outcome {
        GateOutcome::Accepted(identity) => {
            request.extensions_mut().insert(identity);
            Ok(next.run(request).await)
        }
        GateOutcome::Rejected(GateRejection::NoCredential) => {
            tracing::debug!("Request rejected: no credential presented");
            Err(AuthError::Unauthenticated)
        }
        GateOutcome::Rejected(GateRejection::BadToken(err)) => {
            tracing::warn!(reason = %err, "Request rejected: bearer token failed verification");
            Err(AuthError::InvalidToken)
        }
    }
}

/// Extract a named cookie's value from the Cookie header
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

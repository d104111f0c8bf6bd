//! Authentication HTTP Handlers
//!
//! REST endpoints for the credential lifecycle plus the gated dashboard.

use crate::error::AuthError;
use crate::middleware::{self, cookie_value, SESSION_COOKIE};
use crate::models::{AuthIdentity, LoginRequest, MessageResponse, RegisterRequest, UserResponse};
use crate::AppState;

use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    middleware as axum_middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use validator::Validate;

/// Cookie name the pre-session token flow used; cleared on logout so stale
/// clients do not keep presenting it.
const LEGACY_TOKEN_COOKIE: &str = "token";

// ============================================
// Route Builder
// ============================================

/// Assemble the full router: public credential endpoints plus gated routes
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout));

    let protected = Router::new()
        .route("/dashboard", get(dashboard))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new().merge(public).merge(protected).with_state(state)
}

// ============================================
// Cookies
// ============================================

fn session_cookie(session_id: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={session_id}; Path=/; Max-Age={max_age}; HttpOnly; SameSite=Lax"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; HttpOnly")
}

// ============================================
// Registration
// ============================================

/// POST /register
///
/// Create an account, open a session, and hand back a bearer token for API
/// clients.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let registration = state.accounts.register(req).await?;

    let cookie = session_cookie(
        &registration.session_id,
        state.session_ttl,
        state.cookie_secure,
    );

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(serde_json::json!({
            "message": "User created",
            "user": UserResponse::from(registration.user),
            "token": registration.token
        })),
    ))
}

// ============================================
// Login / Logout
// ============================================

/// POST /login
///
/// Verify credentials and set a fresh session cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    req.validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let login = state.accounts.login(req).await?;

    let cookie = session_cookie(&login.session_id, state.session_ttl, state.cookie_secure);

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(MessageResponse::new("Logged in")),
    ))
}

/// POST /logout
///
/// Destroy the caller's session and clear its cookies. Succeeds even when no
/// session (or an already-dead one) was presented.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(session_id) = cookie_value(&headers, SESSION_COOKIE) {
        state.accounts.logout(&session_id).await;
    }

    (
        AppendHeaders([
            (SET_COOKIE, clear_cookie(SESSION_COOKIE)),
            (SET_COOKIE, clear_cookie(LEGACY_TOKEN_COOKIE)),
        ]),
        Json(MessageResponse::new("Logged out")),
    )
}

// ============================================
// Protected
// ============================================

/// GET /dashboard
///
/// Profile of the authenticated caller, password fields excluded. 404 when
/// the identity's backing record has vanished.
pub async fn dashboard(
    State(state): State<AppState>,
    identity: AuthIdentity,
) -> Result<impl IntoResponse, AuthError> {
    let user = state
        .accounts
        .profile(identity.user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    Ok(Json(serde_json::json!({
        "user": UserResponse::from(user)
    })))
}

//! authgate
//!
//! Authentication service for a small web property: account registration
//! with salted password hashing, credential verification at login, and a
//! dual-mode request gate that resolves identity from a server-side session
//! first and falls back to a stateless bearer token.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── config.rs      - environment-driven configuration
//! ├── error.rs       - error taxonomy and JSON error responses
//! ├── models.rs      - entities, request/response types, token claims
//! ├── password.rs    - Argon2id password hashing
//! ├── token.rs       - bearer token issue/verify
//! ├── session.rs     - server-side session store
//! ├── store.rs       - credential store (in-memory and PostgreSQL)
//! ├── service.rs     - account service (register/login/logout)
//! ├── middleware.rs  - authentication gate
//! ├── extractors.rs  - authenticated-identity extractor
//! └── handlers.rs    - HTTP endpoints and router
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: credentials validated, password hashed, record persisted,
//!    then a session cookie and a bearer token are issued together.
//! 2. **Login**: credentials verified, a fresh session opened; concurrent
//!    sessions per user are permitted.
//! 3. **Gated request**: the gate resolves identity from the session cookie,
//!    falling back to `Authorization: Bearer`, and rejects otherwise.
//! 4. **Logout**: the session is destroyed and its cookie cleared;
//!    outstanding bearer tokens stay valid until they expire.
//!
//! # Security
//!
//! - Passwords are hashed with per-call salted Argon2id before storage
//! - Session ids are 256-bit random values held in HTTP-only cookies
//! - Bearer tokens are HMAC-signed with expiry inside the signed payload
//! - Failed logins never reveal whether the email or the password was wrong

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod session;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::AuthConfig;
pub use error::AuthError;
pub use handlers::create_router;
pub use models::{AuthIdentity, LoginRequest, RegisterRequest, UserResponse};
pub use service::AccountService;
pub use session::SessionStore;
pub use store::{CredentialStore, MemoryCredentialStore, PgCredentialStore};
pub use token::TokenIssuer;

use password::PasswordHasher;
use std::sync::Arc;

/// Shared application state. Session store and token issuer are owned
/// components injected into both the account service and the gate, not
/// ambient globals, so either can be substituted later.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub sessions: Arc<SessionStore>,
    pub tokens: Arc<TokenIssuer>,
    pub cookie_secure: bool,
    pub session_ttl: i64,
}

impl AppState {
    /// Wire up the service graph over the given credential store backend
    pub fn new(config: &AuthConfig, store: Arc<dyn CredentialStore>) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session_ttl));
        let tokens = Arc::new(TokenIssuer::new(config));
        let accounts = Arc::new(AccountService::new(
            store,
            PasswordHasher::new(config),
            tokens.clone(),
            sessions.clone(),
        ));

        Self {
            accounts,
            sessions,
            tokens,
            cookie_secure: config.cookie_secure,
            session_ttl: config.session_ttl,
        }
    }
}

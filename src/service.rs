//! Account Service
//!
//! Orchestrates the credential store, password hasher, token issuer, and
//! session store for register, login, and logout. All collaborators are
//! injected rather than reached as ambient globals, so backing stores can be
//! swapped without touching this logic.

use crate::error::AuthError;
use crate::models::{AuthIdentity, LoginRequest, NewUser, RegisterRequest, User};
use crate::password::PasswordHasher;
use crate::session::SessionStore;
use crate::store::CredentialStore;
use crate::token::TokenIssuer;

use std::sync::Arc;
use uuid::Uuid;

/// Outcome of a successful registration
#[derive(Debug)]
pub struct Registration {
    pub user: User,
    pub session_id: String,
    pub token: String,
}

/// Outcome of a successful login
#[derive(Debug)]
pub struct Login {
    pub user: User,
    pub session_id: String,
}

/// Account lifecycle orchestration
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
    sessions: Arc<SessionStore>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            sessions,
        }
    }

    /// Register a new account, returning the identity together with a fresh
    /// session and bearer token.
    ///
    /// Session and token are only minted once the record has been persisted;
    /// a storage failure issues nothing.
    pub async fn register(&self, req: RegisterRequest) -> Result<Registration, AuthError> {
        let email = req.email.trim().to_lowercase();

        // Fast-path duplicate check. The insert below remains the single
        // arbiter of uniqueness under concurrency.
        if self.store.find_by_email(&email).await?.is_some() {
            return Err(AuthError::Conflict);
        }

        let password_hash = self.hasher.hash(&req.password)?;

        let user = self
            .store
            .insert(NewUser {
                display_name: req.username,
                email,
                age: req.age,
                password_hash,
            })
            .await?;

        let identity = AuthIdentity::of(&user);
        let session_id = self.sessions.create(&identity).await;
        let token = self.tokens.issue(&identity)?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(Registration {
            user,
            session_id,
            token,
        })
    }

    /// Verify credentials and open a new session.
    ///
    /// Unknown email and wrong password are deliberately indistinguishable to
    /// the caller. Existing sessions for the user are left untouched.
    pub async fn login(&self, req: LoginRequest) -> Result<Login, AuthError> {
        let email = req.email.trim().to_lowercase();

        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Login attempt for unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(&req.password, &user.password_hash) {
            tracing::debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let identity = AuthIdentity::of(&user);
        let session_id = self.sessions.create(&identity).await;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(Login { user, session_id })
    }

    /// Tear down a session. Idempotent and infallible from the caller's
    /// point of view; outstanding bearer tokens remain valid until expiry.
    pub async fn logout(&self, session_id: &str) {
        self.sessions.destroy(session_id).await;
        tracing::debug!("Session destroyed");
    }

    /// Fetch the profile backing an authenticated identity
    pub async fn profile(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        Ok(self.store.find_by_id(user_id).await?)
    }
}

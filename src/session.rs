//! Server-Side Session Store
//!
//! Sessions are keyed by an opaque, cryptographically random identifier that
//! the client carries in an HTTP-only cookie; the record itself never leaves
//! the server. Destroying a session does not invalidate outstanding bearer
//! tokens for the same user, and vice versa. The two mechanisms serve
//! different clients (browser vs. API caller) and are independent by design.

use crate::models::AuthIdentity;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Server-held session record. Clients only ever see the session id.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// In-process session store
pub struct SessionStore {
    ttl: i64,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            ttl: ttl_secs,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a session for an identity and return its opaque id.
    ///
    /// A user may hold any number of concurrent sessions.
    pub async fn create(&self, identity: &AuthIdentity) -> String {
        let session_id = generate_session_id();
        let now = Utc::now();
        let session = Session {
            user_id: identity.user_id,
            email: identity.email.clone(),
            created_at: now,
            expires_at: now + Duration::seconds(self.ttl),
        };

        let mut sessions = self.sessions.write().await;
        // Stale entries are swept opportunistically on create; resolve
        // already treats them as absent.
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(session_id.clone(), session);

        session_id
    }

    /// Resolve a session id to its identity. Unknown and expired ids are
    /// equally absent.
    pub async fn resolve(&self, session_id: &str) -> Option<AuthIdentity> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(session_id)?;
        if session.is_expired() {
            return None;
        }
        Some(AuthIdentity {
            user_id: session.user_id,
            email: session.email.clone(),
        })
    }

    /// Destroy a session. Idempotent: destroying an unknown id is not an
    /// error.
    pub async fn destroy(&self, session_id: &str) {
        self.sessions.write().await.remove(session_id);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Generate an unguessable session identifier (256 bits, hex-encoded)
fn generate_session_id() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    encode_hex(&bytes)
}

fn encode_hex(data: &[u8]) -> String {
    use std::fmt::Write;
    let mut result = String::with_capacity(data.len() * 2);
    for byte in data {
        write!(result, "{:02x}", byte).unwrap();
    }
    result
}

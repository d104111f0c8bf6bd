//! Credential Store
//!
//! Persistence for credential records behind a backend-agnostic trait. Two
//! backends ship: an in-process map (development, tests) and PostgreSQL.
//! Email uniqueness is case-insensitive and enforced atomically by the insert
//! itself, never by a preceding lookup, so concurrent registrations with the
//! same email resolve to exactly one success.

use crate::models::{NewUser, User};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Credential store failures, classified for the error taxonomy
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return StoreError::DuplicateEmail;
            }
        }
        tracing::error!("Credential store error: {:?}", err);
        StoreError::Unavailable(err.to_string())
    }
}

/// Backend-agnostic credential persistence
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new credential record. Fails with `DuplicateEmail` if the
    /// email is already taken (case-insensitive), regardless of any earlier
    /// lookup the caller performed.
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Look up a record by email, case-insensitive
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Look up a record by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

// ============================================
// In-Memory Backend
// ============================================

/// In-process credential store keyed by lowercased email
#[derive(Default)]
pub struct MemoryCredentialStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let key = new_user.email.to_lowercase();
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            display_name: new_user.display_name,
            email: new_user.email,
            age: new_user.age,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };

        // Uniqueness check and insert happen under one write guard
        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(StoreError::DuplicateEmail);
        }
        users.insert(key, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(&email.to_lowercase()).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.id == id).cloned())
    }
}

// ============================================
// PostgreSQL Backend
// ============================================

/// PostgreSQL credential store
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Connect to the database and ensure the schema exists
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        tracing::info!("Running credential store migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                display_name VARCHAR(100),
                email VARCHAR(255) NOT NULL,
                age INTEGER,
                password_hash VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Case-insensitive uniqueness lives in the index, which is what makes
        // the insert the single arbiter of duplicate emails.
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_lower ON users (lower(email));",
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Credential store migrations completed");
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, display_name, email, age, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING id, display_name, email, age, password_hash, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.display_name)
        .bind(&new_user.email)
        .bind(new_user.age)
        .bind(&new_user.password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, display_name, email, age, password_hash, created_at, updated_at
            FROM users
            WHERE lower(email) = lower($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, display_name, email, age, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            display_name: Some("alice".into()),
            email: email.to_string(),
            age: Some(30),
            password_hash: "$argon2id$v=19$test".into(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let store = MemoryCredentialStore::new();
        let user = store.insert(new_user("a@b.com")).await.unwrap();

        let by_email = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@b.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryCredentialStore::new();
        store.insert(new_user("a@b.com")).await.unwrap();

        let err = store.insert(new_user("a@b.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_email_uniqueness_is_case_insensitive() {
        let store = MemoryCredentialStore::new();
        store.insert(new_user("a@b.com")).await.unwrap();

        let err = store.insert(new_user("A@B.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));

        // Lookup is case-insensitive too
        assert!(store.find_by_email("A@B.COM").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration_one_winner() {
        let store = Arc::new(MemoryCredentialStore::new());

        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.insert(new_user("a@b.com")).await
            }));
        }

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(StoreError::DuplicateEmail) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(conflicts, 3);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let store = MemoryCredentialStore::new();
        assert!(store.find_by_email("a@b.com").await.unwrap().is_none());
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}

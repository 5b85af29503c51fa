use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{SessionToken, UserRecord};
use super::errors::AuthError;

/// Repository abstraction for user/credential persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// `email` is already normalized.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError>;
    /// Fails with [`AuthError::DuplicateEmail`] when the email is taken.
    async fn create_user(&self, email: &str, password_hash: String, password_algorithm: &str) -> Result<UserRecord, AuthError>;
}

/// Repository abstraction for issued tokens, keyed by their digest.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn record(&self, token_hash: &str, user_id: Uuid, purpose: &str) -> Result<SessionToken, AuthError>;
    async fn is_live(&self, token_hash: &str) -> Result<bool, AuthError>;
    /// Returns whether a row was removed.
    async fn revoke(&self, token_hash: &str) -> Result<bool, AuthError>;
    /// Remove rows recorded before `cutoff`; returns how many were removed.
    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError>;
}

/// In-memory repositories for tests, doc examples and the `memory://` backend
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, AuthError> {
        m.lock().map_err(|_| AuthError::Repository("in-memory store lock poisoned".into()))
    }

    #[derive(Default)]
    pub struct MemoryAuthRepository {
        users: Mutex<HashMap<Uuid, UserRecord>>,
    }

    #[async_trait]
    impl AuthRepository for MemoryAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
            let users = lock(&self.users)?;
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError> {
            let users = lock(&self.users)?;
            Ok(users.get(&id).cloned())
        }

        async fn create_user(&self, email: &str, password_hash: String, password_algorithm: &str) -> Result<UserRecord, AuthError> {
            let mut users = lock(&self.users)?;
            if users.values().any(|u| u.email == email) {
                return Err(AuthError::DuplicateEmail);
            }
            let user = UserRecord {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash,
                password_algorithm: password_algorithm.to_string(),
                created_at: Utc::now(),
            };
            users.insert(user.id, user.clone());
            Ok(user)
        }
    }

    #[derive(Default)]
    pub struct MemorySessionRepository {
        tokens: Mutex<HashMap<String, SessionToken>>, // key: token digest
    }

    #[async_trait]
    impl SessionRepository for MemorySessionRepository {
        async fn record(&self, token_hash: &str, user_id: Uuid, purpose: &str) -> Result<SessionToken, AuthError> {
            let mut tokens = lock(&self.tokens)?;
            let t = SessionToken { id: Uuid::new_v4(), user_id, purpose: purpose.to_string(), created_at: Utc::now() };
            tokens.insert(token_hash.to_string(), t.clone());
            Ok(t)
        }

        async fn is_live(&self, token_hash: &str) -> Result<bool, AuthError> {
            let tokens = lock(&self.tokens)?;
            Ok(tokens.contains_key(token_hash))
        }

        async fn revoke(&self, token_hash: &str) -> Result<bool, AuthError> {
            let mut tokens = lock(&self.tokens)?;
            Ok(tokens.remove(token_hash).is_some())
        }

        async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
            let mut tokens = lock(&self.tokens)?;
            let before = tokens.len();
            tokens.retain(|_, t| t.created_at >= cutoff);
            Ok((before - tokens.len()) as u64)
        }
    }
}

//! Session store: keeps issued tokens revocable.
//!
//! Tokens are persisted only as SHA-256 digests; the plaintext is handed to
//! the client once at login.

use std::sync::Arc;

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::SessionToken;
use super::errors::AuthError;
use super::repository::SessionRepository;

/// Hash a session token (SHA-256, single pass; tokens are already high-entropy).
pub fn hash_token(token: &str) -> String {
    let mut h = Sha256::new();
    h.update(token.as_bytes());
    hex::encode(h.finalize())
}

#[derive(Clone)]
pub struct SessionStore {
    repo: Arc<dyn SessionRepository>,
    /// Rows older than this belong to tokens that can no longer validate.
    ttl: Duration,
}

impl SessionStore {
    pub fn new(repo: Arc<dyn SessionRepository>, ttl: Duration) -> Self { Self { repo, ttl } }

    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn record(&self, token: &str, user_id: Uuid, purpose: &str) -> Result<SessionToken, AuthError> {
        self.repo.record(&hash_token(token), user_id, purpose).await
    }

    pub async fn is_live(&self, token: &str) -> Result<bool, AuthError> {
        self.repo.is_live(&hash_token(token)).await
    }

    /// Idempotent: revoking an unknown or already revoked token is not an error.
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let removed = self.repo.revoke(&hash_token(token)).await?;
        debug!(removed, "session revoke");
        Ok(())
    }

    /// Delete rows whose token has outlived the TTL.
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        let purged = self.repo.purge_created_before(Utc::now() - self.ttl).await?;
        if purged > 0 {
            info!(purged, "expired sessions purged");
        }
        Ok(purged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::memory::MemorySessionRepository;

    #[test]
    fn digest_is_hex_sha256() {
        let d = hash_token("abc");
        assert_eq!(d.len(), 64);
        assert_eq!(d, "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[tokio::test]
    async fn revoke_is_idempotent_and_scoped() {
        let store = SessionStore::new(Arc::new(MemorySessionRepository::default()), Duration::hours(1));
        let uid = Uuid::new_v4();
        store.record("t1", uid, "authentication").await.unwrap();
        store.record("t2", uid, "authentication").await.unwrap();

        store.revoke("t1").await.unwrap();
        store.revoke("t1").await.unwrap();
        store.revoke("never-issued").await.unwrap();

        assert!(!store.is_live("t1").await.unwrap());
        assert!(store.is_live("t2").await.unwrap());
    }

    #[tokio::test]
    async fn purge_drops_only_expired_rows() {
        let repo = Arc::new(MemorySessionRepository::default());
        let uid = Uuid::new_v4();
        let fresh = SessionStore::new(repo.clone(), Duration::hours(1));
        fresh.record("old", uid, "authentication").await.unwrap();
        fresh.record("new", uid, "authentication").await.unwrap();
        assert_eq!(fresh.purge_expired().await.unwrap(), 0);

        // a negative TTL puts the cutoff in the future, so every row is stale
        let expired = SessionStore::new(repo, Duration::seconds(-5));
        assert_eq!(expired.purge_expired().await.unwrap(), 2);
        assert!(!fresh.is_live("old").await.unwrap());
        assert!(!fresh.is_live("new").await.unwrap());
    }
}

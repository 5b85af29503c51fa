use sea_orm::{DatabaseConnection, EntityTrait, ColumnTrait, QueryFilter, PaginatorTrait};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::auth::domain::{SessionToken, UserRecord};
use crate::auth::errors::AuthError;
use crate::auth::repository::{AuthRepository, SessionRepository};

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let res = models::user::find_by_email(&self.db, email).await?;
        Ok(res.map(UserRecord::from))
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AuthError> {
        let res = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(UserRecord::from))
    }

    async fn create_user(&self, email: &str, password_hash: String, password_algorithm: &str) -> Result<UserRecord, AuthError> {
        // unique violations surface as ModelError::Conflict -> DuplicateEmail
        let created = models::user::create(&self.db, email, password_hash, password_algorithm).await?;
        Ok(UserRecord::from(created))
    }
}

pub struct SeaOrmSessionRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl SessionRepository for SeaOrmSessionRepository {
    async fn record(&self, token_hash: &str, user_id: Uuid, purpose: &str) -> Result<SessionToken, AuthError> {
        let created = models::token::create(&self.db, user_id, token_hash, purpose).await?;
        Ok(SessionToken::from(created))
    }

    async fn is_live(&self, token_hash: &str) -> Result<bool, AuthError> {
        let n = models::token::Entity::find()
            .filter(models::token::Column::TokenHash.eq(token_hash))
            .count(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(n > 0)
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, AuthError> {
        let removed = models::token::delete_by_hash(&self.db, token_hash).await?;
        Ok(removed)
    }

    async fn purge_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AuthError> {
        Ok(models::token::delete_created_before(&self.db, cutoff).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::hash_token;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn seaorm_user_and_session_roundtrip() -> Result<(), anyhow::Error> {
        if !common::env::db_tests_enabled() { return Ok(()); }
        let db = get_db().await?;
        let users = SeaOrmAuthRepository { db: db.clone() };
        let sessions = SeaOrmSessionRepository { db: db.clone() };

        let email = format!("repo_{}@example.com", Uuid::new_v4());
        let u = users.create_user(&email, "$argon2id$v=19$placeholder".into(), "argon2").await?;
        assert!(matches!(
            users.create_user(&email, "$argon2id$v=19$other".into(), "argon2").await,
            Err(AuthError::DuplicateEmail)
        ));
        assert_eq!(users.find_user_by_email(&email).await?.map(|r| r.id), Some(u.id));
        assert_eq!(users.find_user_by_id(u.id).await?.map(|r| r.email), Some(email.clone()));

        let digest = hash_token(&Uuid::new_v4().to_string());
        sessions.record(&digest, u.id, "authentication").await?;
        assert!(sessions.is_live(&digest).await?);
        assert!(sessions.revoke(&digest).await?);
        assert!(!sessions.revoke(&digest).await?);
        assert!(!sessions.is_live(&digest).await?);

        let stale = hash_token(&Uuid::new_v4().to_string());
        sessions.record(&stale, u.id, "authentication").await?;
        assert!(sessions.purge_created_before(chrono::Utc::now() + chrono::Duration::seconds(1)).await? >= 1);
        assert!(!sessions.is_live(&stale).await?);

        models::user::Entity::delete_by_id(u.id).exec(&db).await?;
        Ok(())
    }
}

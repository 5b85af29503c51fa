use std::sync::Arc;

use chrono::Duration;
use once_cell::sync::Lazy;
use tracing::{info, debug, warn, instrument};

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession};
use super::errors::AuthError;
use super::password::{hash_password, verify_password, PASSWORD_ALGORITHM};
use super::repository::{AuthRepository, SessionRepository};
use super::session::SessionStore;
use super::token::TokenIssuer;
use super::AUTH_PURPOSE;

/// Hash checked against when the email is unknown, so both login failures cost one Argon2 verify.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash_password("dummy-password-for-timing").ok());

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self { jwt_secret: cfg.jwt_secret.clone(), token_ttl: Duration::hours(cfg.token_ttl_hours) }
    }
}

/// Auth business service independent of web framework
pub struct AuthService {
    users: Arc<dyn AuthRepository>,
    sessions: SessionStore,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn AuthRepository>, sessions: Arc<dyn SessionRepository>, cfg: AuthConfig) -> Self {
        Self {
            users,
            sessions: SessionStore::new(sessions, cfg.token_ttl),
            tokens: TokenIssuer::new(&cfg.jwt_secret, cfg.token_ttl),
        }
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::memory::{MemoryAuthRepository, MemorySessionRepository}};
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(
    ///     Arc::new(MemoryAuthRepository::default()),
    ///     Arc::new(MemorySessionRepository::default()),
    ///     AuthConfig { jwt_secret: "secret".into(), token_ttl: chrono::Duration::hours(1) },
    /// );
    /// let input = RegisterInput { email: "user@example.com".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        input.validate()?;
        let email = models::user::normalize_email(&input.email);
        if let Some(existing) = self.users.find_user_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::DuplicateEmail);
        }

        let hash = hash_password(&input.password)?;
        let user = self.users.create_user(&email, hash, PASSWORD_ALGORITHM).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user.public())
    }

    /// Look a user up by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<AuthUser, AuthError> {
        let email = models::user::normalize_email(email);
        self.users
            .find_user_by_email(&email)
            .await?
            .map(|u| u.public())
            .ok_or(AuthError::NotFound)
    }

    /// Authenticate a user, issue a token and record it as live.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthConfig, repository::memory::{MemoryAuthRepository, MemorySessionRepository}};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let svc = AuthService::new(
    ///     Arc::new(MemoryAuthRepository::default()),
    ///     Arc::new(MemorySessionRepository::default()),
    ///     AuthConfig { jwt_secret: "secret".into(), token_ttl: chrono::Duration::hours(1) },
    /// );
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = models::user::normalize_email(&input.email);
        let Some(user) = self.users.find_user_by_email(&email).await? else {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&input.password, dummy);
            }
            return Err(AuthError::Unauthorized);
        };

        if !verify_password(&input.password, &user.password_hash) {
            return Err(AuthError::Unauthorized);
        }

        let token = self.tokens.issue(user.id, AUTH_PURPOSE)?;
        self.sessions.record(&token, user.id, AUTH_PURPOSE).await?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user: user.public(), token })
    }

    /// Signature/purpose check plus user existence; does not consult the session store.
    pub async fn validate_token(&self, token: &str, expected_purpose: &str) -> Result<AuthUser, AuthError> {
        let user_id = self.tokens.decode(token, expected_purpose)?;
        self.users
            .find_user_by_id(user_id)
            .await?
            .map(|u| u.public())
            .ok_or(AuthError::UnknownUser)
    }

    /// Resolve a presented authentication token to its user.
    ///
    /// Both checks must pass: the token validates, and it has not been revoked.
    pub async fn authenticate(&self, token: &str) -> Result<AuthUser, AuthError> {
        let user = self.validate_token(token, AUTH_PURPOSE).await?;
        if !self.sessions.is_live(token).await? {
            warn!(user_id = %user.id, "revoked token presented");
            return Err(AuthError::Revoked);
        }
        Ok(user)
    }

    /// Drop stored sessions older than the token TTL.
    pub async fn purge_expired_sessions(&self) -> Result<u64, AuthError> {
        self.sessions.purge_expired().await
    }

    /// Revoke one token; the user's other tokens stay live.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions.revoke(token).await?;
        info!("user_logged_out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::memory::{MemoryAuthRepository, MemorySessionRepository};
    use crate::auth::session::SessionStore;

    fn svc_with(sessions: Arc<MemorySessionRepository>) -> AuthService {
        AuthService::new(
            Arc::new(MemoryAuthRepository::default()),
            sessions,
            AuthConfig { jwt_secret: "test-secret".into(), token_ttl: Duration::hours(1) },
        )
    }

    fn svc() -> AuthService { svc_with(Arc::new(MemorySessionRepository::default())) }

    fn register(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), password: password.into() }
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn register_then_find_never_exposes_hash() {
        let svc = svc();
        let created = svc.register(register("a@x.com", "secret1")).await.unwrap();
        let found = svc.find_by_email("A@X.com").await.unwrap();
        assert_eq!(found, created);
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 2);

        let stored = svc.users.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "secret1");
        assert!(verify_password("secret1", &stored.password_hash));
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let svc = svc();
        svc.register(register("a@x.com", "secret1")).await.unwrap();
        let err = svc.register(register("A@X.COM", "another1")).await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn register_rejects_directly_built_invalid_input() {
        let svc = svc();
        let err = svc.register(register("not-an-email", "")).await.unwrap_err();
        match err {
            AuthError::Validation(errs) => {
                assert!(errs.has_field("email"));
                assert!(errs.has_field("password"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(matches!(svc.find_by_email("not-an-email").await, Err(AuthError::NotFound)));
    }

    #[test]
    fn unknown_email_path_has_a_hash_to_verify() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        assert!(dummy.starts_with("$argon2"));
        assert!(!verify_password("Secret123", dummy));
    }

    #[tokio::test]
    async fn purge_keeps_live_sessions() {
        let svc = svc();
        svc.register(register("a@x.com", "secret1")).await.unwrap();
        let t = svc.login(login("a@x.com", "secret1")).await.unwrap().token;
        assert_eq!(svc.purge_expired_sessions().await.unwrap(), 0);
        assert!(svc.authenticate(&t).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_email_lookup_is_not_found() {
        assert!(matches!(svc().find_by_email("ghost@x.com").await, Err(AuthError::NotFound)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_uniform() {
        let svc = svc();
        svc.register(register("a@x.com", "secret1")).await.unwrap();
        let wrong = svc.login(login("a@x.com", "secret2")).await.unwrap_err();
        let ghost = svc.login(login("ghost@x.com", "secret1")).await.unwrap_err();
        assert!(matches!(wrong, AuthError::Unauthorized));
        assert!(matches!(ghost, AuthError::Unauthorized));
    }

    #[tokio::test]
    async fn tokens_coexist_and_revoke_independently() {
        let svc = svc();
        let user = svc.register(register("a@x.com", "secret1")).await.unwrap();
        let t1 = svc.login(login("a@x.com", "secret1")).await.unwrap().token;
        let t2 = svc.login(login("a@x.com", "secret1")).await.unwrap().token;
        assert_ne!(t1, t2);
        assert_eq!(svc.authenticate(&t1).await.unwrap(), user);
        assert_eq!(svc.authenticate(&t2).await.unwrap(), user);

        svc.logout(&t1).await.unwrap();
        // still structurally valid, but no longer live
        assert_eq!(svc.validate_token(&t1, AUTH_PURPOSE).await.unwrap(), user);
        assert!(matches!(svc.authenticate(&t1).await, Err(AuthError::Revoked)));
        assert_eq!(svc.authenticate(&t2).await.unwrap(), user);

        svc.logout(&t1).await.unwrap();
    }

    #[tokio::test]
    async fn token_for_missing_user_is_unknown() {
        let sessions = Arc::new(MemorySessionRepository::default());
        let svc = svc_with(sessions.clone());
        let issuer = TokenIssuer::new("test-secret", Duration::hours(1));
        let ghost = uuid::Uuid::new_v4();
        let t = issuer.issue(ghost, AUTH_PURPOSE).unwrap();
        SessionStore::new(sessions, Duration::hours(1)).record(&t, ghost, AUTH_PURPOSE).await.unwrap();
        assert!(matches!(svc.authenticate(&t).await, Err(AuthError::UnknownUser)));
    }

    #[tokio::test]
    async fn unrecorded_token_is_rejected() {
        let svc = svc();
        let user = svc.register(register("a@x.com", "secret1")).await.unwrap();
        let forged_but_signed = TokenIssuer::new("test-secret", Duration::hours(1)).issue(user.id, AUTH_PURPOSE).unwrap();
        let err = svc.authenticate(&forged_but_signed).await.unwrap_err();
        assert!(err.is_unauthenticated());
    }

    #[tokio::test]
    async fn wrong_purpose_token_is_rejected() {
        let svc = svc();
        let user = svc.register(register("a@x.com", "secret1")).await.unwrap();
        let t = TokenIssuer::new("test-secret", Duration::hours(1)).issue(user.id, "verify-email").unwrap();
        assert!(matches!(svc.validate_token(&t, AUTH_PURPOSE).await, Err(AuthError::WrongPurpose)));
    }
}

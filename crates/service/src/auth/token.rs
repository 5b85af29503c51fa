//! Signed tokens embedding a user id and a purpose tag (HS256 JWT).
//!
//! Authenticity is checked without any lookup; whether the token is still
//! live is the session store's job.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::errors::AuthError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// user id
    pub uid: Uuid,
    /// purpose tag
    pub typ: String,
    pub iat: i64,
    pub exp: i64,
    /// unique per issue so repeated logins never collide
    pub jti: Uuid,
}

#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid, purpose: &str) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            uid: user_id,
            typ: purpose.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Recover the user id from a token, checking signature, expiry and purpose.
    pub fn decode(&self, token: &str, expected_purpose: &str) -> Result<Uuid, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            debug!(error = %e, "token rejected");
            AuthError::InvalidToken
        })?;
        if data.claims.typ != expected_purpose {
            return Err(AuthError::WrongPurpose);
        }
        Ok(data.claims.uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AUTH_PURPOSE;

    fn issuer() -> TokenIssuer { TokenIssuer::new("test-secret", Duration::hours(1)) }

    #[test]
    fn issue_then_decode_same_purpose() {
        let uid = Uuid::new_v4();
        let t = issuer().issue(uid, AUTH_PURPOSE).unwrap();
        assert_eq!(issuer().decode(&t, AUTH_PURPOSE).unwrap(), uid);
    }

    #[test]
    fn different_purpose_rejected() {
        let t = issuer().issue(Uuid::new_v4(), "password-reset").unwrap();
        assert!(matches!(issuer().decode(&t, AUTH_PURPOSE), Err(AuthError::WrongPurpose)));
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let uid = Uuid::new_v4();
        assert_ne!(issuer().issue(uid, AUTH_PURPOSE).unwrap(), issuer().issue(uid, AUTH_PURPOSE).unwrap());
    }

    #[test]
    fn tampered_or_foreign_tokens_rejected() {
        let t = issuer().issue(Uuid::new_v4(), AUTH_PURPOSE).unwrap();
        let other = TokenIssuer::new("another-secret", Duration::hours(1));
        assert!(matches!(other.decode(&t, AUTH_PURPOSE), Err(AuthError::InvalidToken)));

        let mut tampered = t.clone();
        tampered.push('x');
        assert!(matches!(issuer().decode(&tampered, AUTH_PURPOSE), Err(AuthError::InvalidToken)));
        assert!(matches!(issuer().decode("garbage", AUTH_PURPOSE), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn expired_token_rejected() {
        // beyond the default 60s leeway
        let expired = TokenIssuer::new("test-secret", Duration::minutes(-5));
        let t = expired.issue(Uuid::new_v4(), AUTH_PURPOSE).unwrap();
        assert!(matches!(issuer().decode(&t, AUTH_PURPOSE), Err(AuthError::InvalidToken)));
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validation::{model_message, Fields, ValidationErrors};

pub const MIN_PASSWORD_LEN: usize = 7;
pub const MAX_PASSWORD_LEN: usize = 100;

/// Registration input
#[derive(Clone, Deserialize)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
}

impl RegisterInput {
    /// Accepts `email` and `password` strings; anything else in the body is ignored.
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::object(body)?;
        let email = f.required_string("email");
        let password = f.required_string("password");

        if let Some(msg) = email.and_then(email_problem) {
            f.reject("email", msg);
        }
        if let Some(msg) = password.and_then(password_problem) {
            f.reject("password", msg);
        }
        f.finish()?;

        match (email, password) {
            (Some(email), Some(password)) => Ok(Self {
                email: models::user::normalize_email(email),
                password: password.to_string(),
            }),
            _ => Err(ValidationErrors::single("body", "email and password are required")),
        }
    }

    /// Same rules as `from_json`, for inputs built directly.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(msg) = email_problem(&self.email) {
            errors.add("email", msg);
        }
        if let Some(msg) = password_problem(&self.password) {
            errors.add("password", msg);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn email_problem(email: &str) -> Option<String> {
    models::user::validate_email(email).err().map(model_message)
}

fn password_problem(password: &str) -> Option<String> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        Some(format!("must be at least {MIN_PASSWORD_LEN} characters"))
    } else if len > MAX_PASSWORD_LEN {
        Some(format!("must be at most {MAX_PASSWORD_LEN} characters"))
    } else {
        None
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput").field("email", &self.email).finish_non_exhaustive()
    }
}

/// Login input
#[derive(Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn from_json(body: &Value) -> Result<Self, ValidationErrors> {
        let mut f = Fields::object(body)?;
        let email = f.required_string("email");
        let password = f.required_string("password");
        f.finish()?;
        match (email, password) {
            (Some(email), Some(password)) => Ok(Self {
                email: models::user::normalize_email(email),
                password: password.to_string(),
            }),
            _ => Err(ValidationErrors::single("body", "email and password are required")),
        }
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput").field("email", &self.email).finish_non_exhaustive()
    }
}

/// Public view of a user: never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Stored user including credentials; stays inside the auth module's callers.
#[derive(Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn public(&self) -> AuthUser {
        AuthUser { id: self.id, email: self.email.clone() }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_algorithm", &self.password_algorithm)
            .finish_non_exhaustive()
    }
}

impl From<models::user::Model> for UserRecord {
    fn from(m: models::user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            password_hash: m.password_hash,
            password_algorithm: m.password_algorithm,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

/// A live session token row; the token itself is only known to its holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub purpose: String,
    pub created_at: DateTime<Utc>,
}

impl From<models::token::Model> for SessionToken {
    fn from(m: models::token::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            purpose: m.purpose,
            created_at: m.created_at.with_timezone(&Utc),
        }
    }
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_input_normalizes_email() {
        let input = RegisterInput::from_json(&json!({"email": "  A@X.com ", "password": "secret1"})).unwrap();
        assert_eq!(input.email, "a@x.com");
        assert_eq!(input.password, "secret1");
    }

    #[test]
    fn register_input_reports_each_field() {
        let errs = RegisterInput::from_json(&json!({"email": "nope", "password": "short"})).unwrap_err();
        assert!(errs.has_field("email"));
        assert!(errs.has_field("password"));

        let errs = RegisterInput::from_json(&json!({"password": 1234567})).unwrap_err();
        assert!(errs.has_field("email"));
        assert!(errs.has_field("password"));
    }

    #[test]
    fn directly_built_input_is_checked() {
        let bad = RegisterInput { email: "not-an-email".into(), password: "".into() };
        let errs = bad.validate().unwrap_err();
        assert!(errs.has_field("email"));
        assert!(errs.has_field("password"));

        let ok = RegisterInput { email: "a@x.com".into(), password: "secret1".into() };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn debug_hides_password() {
        let input = LoginInput { email: "a@x.com".into(), password: "secret1".into() };
        assert!(!format!("{input:?}").contains("secret1"));
        let rec = UserRecord {
            id: Uuid::new_v4(),
            email: "a@x.com".into(),
            password_hash: "$argon2id$secret-hash".into(),
            password_algorithm: "argon2".into(),
            created_at: Utc::now(),
        };
        assert!(!format!("{rec:?}").contains("secret-hash"));
        assert_eq!(rec.public().email, "a@x.com");
    }
}

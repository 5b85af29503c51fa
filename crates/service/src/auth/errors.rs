use thiserror::Error;

use crate::validation::ValidationErrors;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("user not found")]
    NotFound,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("invalid token")]
    InvalidToken,
    #[error("token purpose mismatch")]
    WrongPurpose,
    #[error("token refers to unknown user")]
    UnknownUser,
    #[error("token revoked")]
    Revoked,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::Validation(_) => 1001,
            AuthError::DuplicateEmail => 1002,
            AuthError::NotFound => 1003,
            AuthError::Unauthorized => 1004,
            AuthError::InvalidToken => 1005,
            AuthError::WrongPurpose => 1006,
            AuthError::UnknownUser => 1007,
            AuthError::Revoked => 1008,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }

    /// Whether the caller simply failed to prove who they are.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::Unauthorized
                | AuthError::InvalidToken
                | AuthError::WrongPurpose
                | AuthError::UnknownUser
                | AuthError::Revoked
        )
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self { AuthError::Validation(errors) }
}

impl From<models::errors::ModelError> for AuthError {
    fn from(e: models::errors::ModelError) -> Self {
        use models::errors::ModelError;
        match e {
            // inputs are validated before they reach the store; a rejection here is an internal fault
            ModelError::Validation(msg) => AuthError::Repository(format!("store rejected value: {msg}")),
            ModelError::Conflict(_) => AuthError::DuplicateEmail,
            ModelError::Db(msg) => AuthError::Repository(msg),
        }
    }
}

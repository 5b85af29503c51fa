//! Salted one-way password hashing (Argon2id, PHC string format).

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use rand::rngs::OsRng;
use tracing::warn;

use super::errors::AuthError;

/// Algorithm tag stored next to every hash.
pub const PASSWORD_ALGORITHM: &str = "argon2";

/// Hash with a fresh random salt; the same plaintext never hashes the same twice.
pub fn hash_password(plaintext: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Check a plaintext against a stored hash using the salt and parameters it embeds.
///
/// The digest comparison is constant-time. A malformed stored hash is treated
/// as a mismatch rather than an error.
pub fn verify_password(plaintext: &str, hashed: &str) -> bool {
    let parsed = match PasswordHash::new(hashed) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "stored password hash is not a valid PHC string");
            return false;
        }
    };
    Argon2::default().verify_password(plaintext.as_bytes(), &parsed).is_ok()
}

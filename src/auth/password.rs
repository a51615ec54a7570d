use argon2::{
    password_hash::{
        Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::ApiError;

/// Argon2id with the crate defaults; every hash carries its own salt.
pub fn hash_password(plain: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(internal)
}

/// A mismatch is an ordinary `false`. A stored hash that does not parse
/// means the credential record is corrupt and surfaces as a 500, never
/// as a login failure.
pub fn verify_password(plain: &str, stored: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored).map_err(internal)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(internal(e)),
    }
}

fn internal(e: HashError) -> ApiError {
    ApiError::Internal(anyhow::anyhow!("password hashing: {e}"))
}

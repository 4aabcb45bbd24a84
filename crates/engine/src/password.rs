//! Argon2id password hashing.

use argon2::{
    Argon2, PasswordHash,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::{EngineError, ResultEngine};

/// Hashes `password` into a PHC string.
pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| EngineError::Password(e.to_string()))
}

/// `Ok(false)` on a wrong password, `Err` only when the stored hash is corrupt.
pub(crate) fn verify_password(password: &str, hash: &str) -> ResultEngine<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| EngineError::Password(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

//! Password hashing and session tokens
//!
//! Passwords are stored as Argon2id PHC strings with a random salt per user.
//! Session tokens are 32 random bytes, hex encoded. Only the SHA-256 digest of
//! a token is ever written to the database.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Environment variable overriding the session lifetime in hours
pub const SESSION_TTL_ENV: &str = "LEADBOOK_SESSION_TTL_HOURS";

/// Default session lifetime (one week)
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 168;

const TOKEN_BYTES: usize = 32;

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Auth(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string
///
/// A malformed stored hash is an error; a wrong password is `Ok(false)`.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| Error::Auth(format!("Invalid stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Fresh random bearer token
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest stored in place of the token
pub fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Session lifetime from `LEADBOOK_SESSION_TTL_HOURS`, falling back to the default
pub fn session_ttl_hours_from_env() -> i64 {
    std::env::var(SESSION_TTL_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|hours| *hours > 0)
        .unwrap_or(DEFAULT_SESSION_TTL_HOURS)
}

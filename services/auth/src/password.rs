//! Salted password hashing.
//!
//! Argon2id with the crate's default cost (m=19456 KiB, t=2, p=1) and a fresh
//! 16-byte salt per hash. Neither the plaintext nor the stored hash is ever
//! logged.

use anyhow::{Context as _, anyhow};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::error::AuthServiceError;

const SALT_LEN: usize = 16;

/// Hash a new password. Call exactly once per password change.
pub fn hash_password(plain: &str) -> Result<String, AuthServiceError> {
    let salt_bytes: [u8; SALT_LEN] = rand::random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!("encode salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?
        .to_string();
    Ok(hash)
}

/// Compare a plaintext against a stored hash.
///
/// An unparseable stored hash never matches.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            return false;
        }
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// [`hash_password`] on the blocking pool, off the async workers.
pub async fn hash_password_task(plain: &str) -> Result<String, AuthServiceError> {
    let plain = plain.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .context("join password hash task")?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_task(
    plain: &str,
    stored_hash: &str,
) -> Result<bool, AuthServiceError> {
    let (plain, stored_hash) = (plain.to_owned(), stored_hash.to_owned());
    let matches = tokio::task::spawn_blocking(move || verify_password(&plain, &stored_hash))
        .await
        .context("join password verify task")?;
    Ok(matches)
}

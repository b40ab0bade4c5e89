//! API key helpers: generation, hashing and verification.
//!
//! Keys are stored as an argon2 hash plus a short clear-text prefix used to narrow
//! the lookup before verification.

use crate::AppError;

/// Length of the clear-text prefix kept alongside the hash.
pub const KEY_PREFIX_LENGTH: usize = 16;

/// Generate a secure API key
pub fn generate_api_key() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..20).map(|_| rng.random()).collect();
    let random_part = hex::encode(random_bytes);

    // Format: ca_live_<40 hex chars>
    format!("ca_live_{}", random_part)
}

/// Hash an API key for storage
pub fn hash_api_key(key: &str) -> Result<String, AppError> {
    use argon2::{
        password_hash::{PasswordHasher, SaltString},
        Argon2,
    };
    use rand_core::OsRng;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(key.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::StorageFailure(format!("Failed to hash API key: {}", e)))
}

/// Verify an API key against a stored hash.
pub fn verify_api_key(key: &str, hash: &str) -> Result<bool, AppError> {
    use argon2::{
        password_hash::{PasswordHash, PasswordVerifier},
        Argon2,
    };

    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::StorageFailure(format!("Invalid hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(key.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Extract the key prefix for identification.
pub fn extract_key_prefix(key: &str) -> String {
    key.chars().take(KEY_PREFIX_LENGTH).collect()
}

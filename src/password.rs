use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use std::sync::Arc;

use crate::error::ApiError;

/// PasswordService
///
/// The stateless password-hashing capability injected at the workflow
/// boundary. Keeping it behind a trait lets the test suite swap the real
/// Argon2 implementation for a transparent mock, the same way the repository
/// is swapped.
pub trait PasswordService: Send + Sync {
    /// Hashes a plain-text password for storage.
    fn hash(&self, password: &str) -> Result<String, ApiError>;

    /// Verifies a plain-text password against a stored hash. Malformed hashes
    /// verify as false rather than erroring.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// PasswordState
///
/// The shared handle used to carry the hashing capability in application state.
pub type PasswordState = Arc<dyn PasswordService>;

/// Argon2PasswordService
///
/// Production implementation: Argon2id with the crate's default parameters and
/// a fresh random salt per hash. The struct is zero-sized; an `Argon2` context
/// is built per call.
#[derive(Clone, Default)]
pub struct Argon2PasswordService;

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::Hashing(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        PasswordHash::new(hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

/// MockPasswordService
///
/// Test implementation with a reversible, human-readable "hash". Never used
/// outside the test suite.
#[derive(Clone, Default)]
pub struct MockPasswordService;

impl PasswordService for MockPasswordService {
    fn hash(&self, password: &str) -> Result<String, ApiError> {
        Ok(format!("hashed::{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        hash == format!("hashed::{password}")
    }
}

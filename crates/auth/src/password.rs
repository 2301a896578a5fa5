//! Password hashing port and its argon2 implementation.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

impl From<argon2::password_hash::Error> for PasswordHashError {
    fn from(value: argon2::password_hash::Error) -> Self {
        Self(value.to_string())
    }
}

/// One-way password hashing.
///
/// Implementations never retain the plaintext. `verify` must accept any hash
/// previously produced by `hash` for the same plaintext.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError>;

    fn verify(&self, plaintext: &str, hash: &str) -> bool;
}

impl<H> PasswordHasher for std::sync::Arc<H>
where
    H: PasswordHasher + ?Sized,
{
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        (**self).hash(plaintext)
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        (**self).verify(plaintext, hash)
    }
}

/// Argon2id with default parameters and a random salt per hash (PHC string output).
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordHashError> {
        use argon2::PasswordHasher as _;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default().hash_password(plaintext.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

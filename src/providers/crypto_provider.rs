use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier,
    Version,
};
use rand::Rng;

use crate::errors::InternalError;

/// Alphabet for generated one-time passwords
const PASSWORD_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                                  abcdefghijklmnopqrstuvwxyz\
                                  0123456789\
                                  !@#$%^&*()_+-=[]{}|;:,.<>?";

pub const GENERATED_PASSWORD_LENGTH: usize = 20;

/// Cryptographic operations provider
///
/// Generates one-time passwords for new staff accounts and hashes credentials
/// for the local identity backend with Argon2id keyed by the server pepper.
pub struct CryptoProvider {
    password_pepper: String,
}

impl CryptoProvider {
    pub fn new(password_pepper: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
        }
    }

    /// Generate a cryptographically secure random password
    ///
    /// # Returns
    /// A 20-character password drawn from upper and lower case letters,
    /// digits, and symbols
    pub fn generate_secure_password(&self) -> String {
        let mut rng = rand::rng();
        (0..GENERATED_PASSWORD_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..PASSWORD_CHARSET.len());
                PASSWORD_CHARSET[idx] as char
            })
            .collect()
    }

    fn argon2(&self) -> Result<Argon2<'_>, InternalError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| InternalError::crypto("argon2_init", e.to_string()))
    }

    /// Hash a password into PHC string format
    pub async fn hash_password(&self, password: &str) -> Result<String, InternalError> {
        let salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| InternalError::crypto("password_hash", e.to_string()))?
            .to_string();

        Ok(hash)
    }

    /// Check a password against a stored PHC hash
    ///
    /// # Returns
    /// * `Ok(false)` - Hash is well-formed but the password does not match
    /// * `Err(InternalError)` - Stored hash could not be parsed
    pub async fn verify_password(&self, password_hash: &str, password: &str) -> Result<bool, InternalError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| InternalError::crypto("password_hash_parse", e.to_string()))?;

        Ok(self
            .argon2()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}

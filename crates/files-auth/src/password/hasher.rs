//! Argon2id password digests.
//!
//! The digest is a PHC string carrying its own salt and parameters, so
//! digests produced under older cost settings still verify.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use files_core::config::auth::AuthConfig;
use files_core::error::AppError;

/// Computes and verifies one-way password digests using Argon2id.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Creates a hasher with the cost parameters from configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.password_memory_kib,
            config.password_iterations,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| AppError::configuration(format!("Invalid Argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Digests a plaintext password with a random salt.
    pub fn digest(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
        Ok(hash.to_string())
    }

    /// Checks a plaintext password against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch; an unparsable digest is an error.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| AppError::internal(format!("Invalid password digest format: {e}")))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::new(&AuthConfig {
            password_memory_kib: 64,
            password_iterations: 1,
            ..AuthConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_digest_verifies() {
        let hasher = cheap();
        let digest = hasher.digest("toto1234!").unwrap();
        assert_ne!(digest, "toto1234!");
        assert!(hasher.verify("toto1234!", &digest).unwrap());
        assert!(!hasher.verify("toto1235!", &digest).unwrap());
    }

    #[test]
    fn test_digest_is_salted() {
        let hasher = cheap();
        assert_ne!(hasher.digest("same").unwrap(), hasher.digest("same").unwrap());
    }

    #[test]
    fn test_garbage_digest_is_error() {
        assert!(cheap().verify("x", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let config = AuthConfig {
            password_memory_kib: 1,
            ..AuthConfig::default()
        };
        assert!(PasswordHasher::new(&config).is_err());
    }
}

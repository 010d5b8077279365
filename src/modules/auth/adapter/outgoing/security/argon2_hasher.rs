use argon2::{
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use async_trait::async_trait;
use rand_core::OsRng;

use crate::auth::application::ports::outgoing::password_hasher::{
    HashError, PasswordHasher as HasherTrait,
};

const DEFAULT_MEMORY_KIB: u32 = 4 * 1024;
const DEFAULT_ITERATIONS: u32 = 3;
const DEFAULT_PARALLELISM: u32 = 1;

/// Argon2id hasher. Hashing runs on the blocking pool so request workers
/// are never stalled by the KDF.
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::with_params(DEFAULT_MEMORY_KIB, DEFAULT_ITERATIONS, DEFAULT_PARALLELISM)
    }
}

impl Argon2Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-range values fall back to the argon2 crate defaults.
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        let params = Params::new(memory_kib, iterations, parallelism, None).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid Argon2 params, using library defaults");
            Params::default()
        });

        Self { params }
    }

    pub fn from_env() -> Self {
        fn read(key: &str, default: u32) -> u32 {
            std::env::var(key)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        }

        Self::with_params(
            read("ARGON2_MEMORY_KIB", DEFAULT_MEMORY_KIB),
            read("ARGON2_ITERATIONS", DEFAULT_ITERATIONS),
            read("ARGON2_PARALLELISM", DEFAULT_PARALLELISM),
        )
    }
}

#[async_trait]
impl HasherTrait for Argon2Hasher {
    async fn hash_password(&self, password: &str) -> Result<String, HashError> {
        let password = password.to_string();
        let params = self.params.clone();

        tokio::task::spawn_blocking(move || {
            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
            let salt = SaltString::generate(&mut OsRng);

            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|_| HashError::HashFailed)
        })
        .await
        .map_err(|_| HashError::TaskFailed)?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, HashError> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || {
            let parsed_hash = PasswordHash::new(&hash).map_err(|_| HashError::VerifyFailed)?;

            // Parameters come from the PHC string, not from `self.params`.
            match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
                Ok(_) => Ok(true),
                Err(PasswordHashError::Password) => Ok(false),
                Err(_) => Err(HashError::VerifyFailed),
            }
        })
        .await
        .map_err(|_| HashError::TaskFailed)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashes_with_argon2id_and_verifies() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash_password("Corr3ct-Horse-Battery").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher
            .verify_password("Corr3ct-Horse-Battery", &hash)
            .await
            .unwrap());
        assert!(!hasher.verify_password("wrong-horse", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_different_salts() {
        let hasher = Argon2Hasher::new();
        let a = hasher.hash_password("s4me-password").await.unwrap();
        let b = hasher.hash_password("s4me-password").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn garbage_hash_is_a_verify_error() {
        let hasher = Argon2Hasher::new();
        let result = hasher.verify_password("whatever", "invalid-hash").await;
        assert!(matches!(result, Err(HashError::VerifyFailed)));
    }

    #[tokio::test]
    async fn tampered_params_are_a_verify_error() {
        let hasher = Argon2Hasher::new();
        let valid_hash = hasher.hash_password("password123").await.unwrap();

        let mut parts: Vec<&str> = valid_hash.split('$').collect();
        parts[3] = "m=0,t=0,p=0";
        let tampered = parts.join("$");

        let result = hasher.verify_password("password123", &tampered).await;
        assert!(matches!(result, Err(HashError::VerifyFailed)));
    }

    #[tokio::test]
    async fn invalid_params_fall_back_to_defaults() {
        let hasher = Argon2Hasher::with_params(0, 0, 0);
        let hash = hasher.hash_password("still-works-1").await.unwrap();
        assert!(hasher.verify_password("still-works-1", &hash).await.unwrap());
    }
}

//! Password hashing using argon2
//!
//! Argon2id with configurable salt length, output length, time cost and
//! memory cost. Hashing is CPU-intensive, so async callers go through
//! `spawn_blocking`.

use crate::config::ArgonConfig;
use anyhow::Result;
use argon2::{
    password_hash::{
        rand_core::{OsRng, RngCore},
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::sync::Arc;
use tracing::warn;

/// Password hashing service
#[derive(Clone)]
pub struct PasswordService {
    params: Arc<Params>,
    salt_length: usize,
}

impl PasswordService {
    pub fn new(config: &ArgonConfig) -> Result<Self> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            1,
            Some(config.hash_length),
        )
        .map_err(|e| anyhow::anyhow!("Invalid argon2 parameters: {}", e))?;

        Ok(Self {
            params: Arc::new(params),
            salt_length: config.salt_length,
        })
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, (*self.params).clone())
    }

    /// Hash a password into a self-describing PHC string (blocking operation)
    pub fn hash(&self, password: &str) -> Result<String> {
        let mut salt_bytes = vec![0u8; self.salt_length];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| anyhow::anyhow!("Failed to encode salt: {}", e))?;

        let hash = self
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(&self, password: String) -> Result<String> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))?
    }

    /// Verify a password against a stored hash (blocking operation).
    ///
    /// Parameters are read from the hash itself, so hashes made under older
    /// cost settings keep verifying. A stored value that does not parse
    /// never matches.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Stored password hash is not a valid PHC string: {}", e);
                return false;
            }
        };
        self.hasher()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    pub async fn verify_async(&self, password: String, hash: String) -> Result<bool> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&password, &hash))
            .await
            .map_err(|e| anyhow::anyhow!("Task join error: {}", e))
    }
}

use async_trait::async_trait;
use auth::PasswordHasher;

use crate::account::errors::HashingError;
use crate::account::ports::CredentialHasher;

/// Argon2id hashing moved off the async runtime.
///
/// Each call runs on tokio's blocking pool so a slow hash does not stall
/// other requests on the same worker thread.
pub struct Argon2CredentialHasher {
    hasher: PasswordHasher,
}

impl Argon2CredentialHasher {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self { hasher }
    }
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<String, HashingError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| HashingError::HashingFailed(e.to_string()))?
            .map_err(HashingError::from)
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, HashingError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| HashingError::VerificationFailed(e.to_string()))?
            .map_err(HashingError::from)
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::ports::AccountRepository;

/// Process-local account store keyed by normalized email.
///
/// Enforces the same uniqueness rule as the Postgres table. Used by the
/// integration tests and for running the service without a database.
#[derive(Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<String, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    /// Drop an account, as an administrator would out of band.
    pub async fn remove(&self, email: &EmailAddress) -> Option<Account> {
        self.accounts.write().await.remove(email.as_str())
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn create(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;
        let key = account.email.as_str().to_string();

        if accounts.contains_key(&key) {
            return Err(AccountError::DuplicateCredential(key));
        }

        accounts.insert(key, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError> {
        Ok(self.accounts.read().await.get(email.as_str()).cloned())
    }

    async fn update(&self, account: Account) -> Result<Account, AccountError> {
        let mut accounts = self.accounts.write().await;

        let Some(stored) = accounts.get_mut(account.email.as_str()) else {
            return Err(AccountError::PrincipalNotFound(
                account.email.as_str().to_string(),
            ));
        };

        stored.display_name = account.display_name.clone();
        stored.password_hash = account.password_hash.clone();
        stored.bio = account.bio.clone();
        stored.avatar_path = account.avatar_path.clone();
        stored.updated_at = account.updated_at;

        Ok(stored.clone())
    }
}

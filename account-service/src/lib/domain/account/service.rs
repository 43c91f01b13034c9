use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticatedContext;
use auth::Authenticator;
use auth::TokenKind;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::OnceCell;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::EmailAddress;
use crate::account::models::Role;
use crate::account::models::SignInCommand;
use crate::account::models::SignInResult;
use crate::account::models::SignUpCommand;
use crate::account::models::UpdateProfileCommand;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialHasher;

/// Domain service implementation for account operations.
///
/// Coordinates the credential store, the hasher and the session
/// authenticator. Holds no per-user state; each call works on its own
/// account snapshot.
pub struct AccountService<AR, CH>
where
    AR: AccountRepository,
    CH: CredentialHasher,
{
    repository: Arc<AR>,
    hasher: Arc<CH>,
    authenticator: Arc<Authenticator>,
    token_ttl: Duration,
    decoy_hash: OnceCell<String>,
}

/// Secret hashed once and verified against when the identifier is unknown.
const DECOY_SECRET: &str = "decoy-secret-for-unknown-accounts";

impl<AR, CH> AccountService<AR, CH>
where
    AR: AccountRepository,
    CH: CredentialHasher,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `hasher` - Credential hashing implementation
    /// * `authenticator` - Session token issuer/validator
    /// * `token_ttl` - Lifetime of access and refresh tokens
    pub fn new(
        repository: Arc<AR>,
        hasher: Arc<CH>,
        authenticator: Arc<Authenticator>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            hasher,
            authenticator,
            token_ttl,
            decoy_hash: OnceCell::new(),
        }
    }

    /// Spend one verification on a decoy hash so an unknown identifier
    /// costs as much as a wrong password.
    async fn verify_decoy(&self, password: &str) {
        let decoy = self
            .decoy_hash
            .get_or_try_init(|| self.hasher.hash(DECOY_SECRET))
            .await;

        match decoy {
            Ok(hash) => {
                let _ = self.hasher.verify(password, hash).await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to build decoy hash"),
        }
    }

    fn start_session(&self, account: Account) -> Result<SignInResult, AccountError> {
        let tokens = self.authenticator.issue_session(
            account.email.as_str(),
            account.role.as_str(),
            self.token_ttl,
        )?;

        Ok(SignInResult { account, tokens })
    }
}

#[async_trait]
impl<AR, CH> AccountServicePort for AccountService<AR, CH>
where
    AR: AccountRepository,
    CH: CredentialHasher,
{
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError> {
        // Checked before hashing so a duplicate costs no Argon2 run.
        if self
            .repository
            .find_by_email(&command.email)
            .await?
            .is_some()
        {
            tracing::info!(email = %command.email, "Sign-up rejected: email already registered");
            return Err(AccountError::DuplicateCredential(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self.hasher.hash(command.password.expose()).await?;

        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: command.email,
            display_name: command.display_name,
            password_hash,
            bio: None,
            avatar_path: None,
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(account).await?;
        tracing::info!(account_id = %created.id, "Account created");

        Ok(created)
    }

    async fn sign_in(&self, command: SignInCommand) -> Result<SignInResult, AccountError> {
        let Ok(email) = EmailAddress::new(command.identifier) else {
            self.verify_decoy(&command.password).await;
            tracing::debug!("Sign-in rejected: identifier is not an email");
            return Err(AccountError::CredentialInvalid);
        };

        let Some(account) = self.repository.find_by_email(&email).await? else {
            self.verify_decoy(&command.password).await;
            tracing::debug!("Sign-in rejected: unknown identifier");
            return Err(AccountError::CredentialInvalid);
        };

        match self
            .hasher
            .verify(&command.password, &account.password_hash)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(account_id = %account.id, "Sign-in rejected: password mismatch");
                return Err(AccountError::CredentialInvalid);
            }
            Err(e) => {
                tracing::error!(
                    account_id = %account.id,
                    error = %e,
                    "Stored password hash is unreadable"
                );
                return Err(AccountError::CredentialInvalid);
            }
        }

        let result = self.start_session(account)?;
        tracing::info!(
            account_id = %result.account.id,
            expires_at = %result.tokens.expires_at,
            "Session issued"
        );

        Ok(result)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<SignInResult, AccountError> {
        let context = self
            .authenticator
            .authenticate(refresh_token, TokenKind::Refresh)?;
        let account = self.reauthenticate(&context).await?;

        let result = self.start_session(account)?;
        tracing::info!(account_id = %result.account.id, "Session refreshed");

        Ok(result)
    }

    async fn reauthenticate(
        &self,
        context: &AuthenticatedContext,
    ) -> Result<Account, AccountError> {
        let not_found = || AccountError::PrincipalNotFound(context.subject.clone());

        let email = EmailAddress::new(context.subject.clone()).map_err(|_| not_found())?;

        self.repository
            .find_by_email(&email)
            .await?
            .ok_or_else(not_found)
    }

    async fn update_profile(
        &self,
        context: &AuthenticatedContext,
        command: UpdateProfileCommand,
    ) -> Result<Account, AccountError> {
        let mut account = self.reauthenticate(context).await?;

        if let Some(display_name) = command.display_name {
            account.display_name = display_name;
        }

        if let Some(bio) = command.bio {
            account.bio = Some(bio);
        }

        if let Some(avatar_path) = command.avatar_path {
            account.avatar_path = Some(avatar_path);
        }

        if let Some(password) = command.password {
            account.password_hash = self.hasher.hash(password.expose()).await?;
        }

        account.updated_at = Utc::now();

        let updated = self.repository.update(account).await?;
        tracing::info!(account_id = %updated.id, "Profile updated");

        Ok(updated)
    }
}

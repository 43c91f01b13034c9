use async_trait::async_trait;
use auth::AuthenticatedContext;

use crate::account::errors::AccountError;
use crate::account::errors::HashingError;
use crate::account::models::Account;
use crate::account::models::EmailAddress;
use crate::account::models::SignInCommand;
use crate::account::models::SignInResult;
use crate::account::models::SignUpCommand;
use crate::account::models::UpdateProfileCommand;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account with role `USER`.
    ///
    /// # Arguments
    /// * `command` - Validated email, display name, and password
    ///
    /// # Returns
    /// Stored account
    ///
    /// # Errors
    /// * `DuplicateCredential` - Email is already registered
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn sign_up(&self, command: SignUpCommand) -> Result<Account, AccountError>;

    /// Verify a credential and issue an access/refresh token pair.
    ///
    /// # Arguments
    /// * `command` - Raw identifier and secret
    ///
    /// # Returns
    /// Account and session tokens
    ///
    /// # Errors
    /// * `CredentialInvalid` - Unknown identifier or wrong secret (indistinguishable)
    /// * `Hashing` - Stored hash is unreadable
    /// * `DatabaseError` - Database operation failed
    async fn sign_in(&self, command: SignInCommand) -> Result<SignInResult, AccountError>;

    /// Exchange a refresh token for a fresh token pair.
    ///
    /// # Arguments
    /// * `refresh_token` - Token previously returned as `refresh_token`
    ///
    /// # Errors
    /// * `Token` - Refresh token is malformed, forged, expired, or an access token
    /// * `PrincipalNotFound` - Account no longer exists
    async fn refresh(&self, refresh_token: &str) -> Result<SignInResult, AccountError>;

    /// Resolve the account behind an authenticated request.
    ///
    /// # Errors
    /// * `PrincipalNotFound` - No stored account for the token subject
    /// * `DatabaseError` - Database operation failed
    async fn reauthenticate(&self, context: &AuthenticatedContext)
        -> Result<Account, AccountError>;

    /// Update the caller's own profile.
    ///
    /// # Arguments
    /// * `context` - Identity of the caller
    /// * `command` - Optional display name, bio, password, avatar path
    ///
    /// # Returns
    /// Updated account
    ///
    /// # Errors
    /// * `PrincipalNotFound` - No stored account for the token subject
    /// * `Hashing` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        context: &AuthenticatedContext,
        command: UpdateProfileCommand,
    ) -> Result<Account, AccountError>;
}

/// Persistence operations for the account aggregate.
///
/// Implementations must enforce email uniqueness at the storage layer.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// # Errors
    /// * `DuplicateCredential` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve an account by its (normalized) email.
    ///
    /// # Returns
    /// Optional account (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Store profile changes for an existing account.
    ///
    /// Writes display name, password hash, bio, avatar path and `updated_at`;
    /// email and role are left untouched.
    ///
    /// # Errors
    /// * `PrincipalNotFound` - Account does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, account: Account) -> Result<Account, AccountError>;
}

/// One-way hashing of account secrets.
#[async_trait]
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext secret for storage.
    async fn hash(&self, password: &str) -> Result<String, HashingError>;

    /// Check a plaintext secret against a stored hash. A mismatch is `Ok(false)`.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, HashingError>;
}

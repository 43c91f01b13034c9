use std::fmt;
use std::str::FromStr;

use auth::SessionTokens;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordError;
use crate::account::errors::RoleError;

/// Account aggregate entity.
///
/// The email is the sign-in identifier and the subject of every token
/// issued for the account. `password_hash` stays inside the service: it has
/// no serializer and `Debug` redacts it.
#[derive(Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub password_hash: String,
    pub bio: Option<String>,
    pub avatar_path: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .field("password_hash", &"<redacted>")
            .field("bio", &self.bio)
            .field("avatar_path", &self.avatar_path)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validated with an RFC 5322 parser, then trimmed and lower-cased so the
/// same mailbox always maps to the same stored record and token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| EmailAddress(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Trimmed, non-blank, at most 64 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const MAX_LENGTH: usize = 64;

    /// # Errors
    /// * `Blank` - Empty or whitespace only
    /// * `TooLong` - More than 64 characters after trimming
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();

        if length == 0 {
            Err(DisplayNameError::Blank)
        } else if length > Self::MAX_LENGTH {
            Err(DisplayNameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password on its way to the hasher. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// # Errors
    /// * `Blank` - Empty or whitespace only
    pub fn new(password: String) -> Result<Self, PasswordError> {
        if password.trim().is_empty() {
            return Err(PasswordError::Blank);
        }
        Ok(Self(password))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Authorization role. Assigned at sign-up, never changed by the account owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct SignUpCommand {
    pub email: EmailAddress,
    pub display_name: DisplayName,
    pub password: Password,
}

impl SignUpCommand {
    pub fn new(email: EmailAddress, display_name: DisplayName, password: Password) -> Self {
        Self {
            email,
            display_name,
            password,
        }
    }
}

/// Credential presented at sign-in.
///
/// The identifier is kept raw: an unparseable email must fail exactly like
/// an unknown one, so validation happens inside the service.
pub struct SignInCommand {
    pub identifier: String,
    pub password: String,
}

impl SignInCommand {
    pub fn new(identifier: String, password: String) -> Self {
        Self {
            identifier,
            password,
        }
    }
}

impl fmt::Debug for SignInCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignInCommand")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Command to update the caller's own profile.
///
/// All fields are optional to support partial updates. Role is not here on
/// purpose: it cannot be changed through this path.
#[derive(Debug, Default)]
pub struct UpdateProfileCommand {
    pub display_name: Option<DisplayName>,
    pub bio: Option<String>,
    pub password: Option<Password>,
    pub avatar_path: Option<String>,
}

/// Outcome of a successful sign-in or refresh.
#[derive(Debug, Clone)]
pub struct SignInResult {
    pub account: Account,
    pub tokens: SessionTokens,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let email = EmailAddress::new("  Alice@Example.COM ".to_string()).unwrap();
        assert_eq!(email.as_str(), "alice@example.com");
        assert_eq!(
            email,
            EmailAddress::new("alice@example.com".to_string()).unwrap()
        );
    }

    #[test]
    fn test_email_rejects_garbage() {
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_display_name_rules() {
        assert_eq!(
            DisplayName::new("  Alice  ".to_string()).unwrap().as_str(),
            "Alice"
        );
        assert_eq!(
            DisplayName::new("   ".to_string()),
            Err(DisplayNameError::Blank)
        );
        assert_eq!(
            DisplayName::new("x".repeat(65)),
            Err(DisplayNameError::TooLong { max: 64, actual: 65 })
        );
    }

    #[test]
    fn test_password_is_redacted() {
        let password = Password::new("hunter22".to_string()).unwrap();
        assert_eq!(password.expose(), "hunter22");
        assert!(!format!("{:?}", password).contains("hunter22"));
        assert_eq!(Password::new(" ".to_string()), Err(PasswordError::Blank));
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::default(), Role::User);
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!(Role::User.to_string(), "USER");
        assert!(matches!("root".parse::<Role>(), Err(RoleError::Unknown(_))));
    }

    #[test]
    fn test_account_debug_hides_hash() {
        let now = Utc::now();
        let account = Account {
            id: AccountId::new(),
            email: EmailAddress::new("bob@example.com".to_string()).unwrap(),
            display_name: DisplayName::new("Bob".to_string()).unwrap(),
            password_hash: "$argon2id$secret_hash".to_string(),
            bio: None,
            avatar_path: None,
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        let printed = format!("{:?}", account);
        assert!(printed.contains("bob@example.com"));
        assert!(!printed.contains("secret_hash"));
    }
}

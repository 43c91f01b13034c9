//! Authentication utilities library
//!
//! Provides the credential and session-token core used by the account service:
//! - Password hashing (Argon2id)
//! - Signed, time-bounded JWT access and refresh tokens (HS256)
//! - Session issuing and token-to-identity validation
//!
//! Services define their own ports around these types (repositories, hashing
//! on a blocking pool) and keep domain rules on their side.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{SigningKey, TokenCodec};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(SigningKey::from_secret(b"secret_key_at_least_32_bytes_long!"));
//! let token = codec.issue("alice@example.com", "ADMIN", Duration::hours(24)).unwrap();
//! let claims = codec.decode(&token).unwrap();
//! assert_eq!(claims.sub, "alice@example.com");
//! assert!(!codec.is_expired(&claims));
//! ```
//!
//! ## Sessions
//! ```
//! use auth::{Authenticator, SigningKey, TokenCodec, TokenKind};
//! use chrono::Duration;
//!
//! let codec = TokenCodec::new(SigningKey::from_secret(b"secret_key_at_least_32_bytes_long!"));
//! let authenticator = Authenticator::new(codec);
//!
//! let session = authenticator
//!     .issue_session("alice@example.com", "USER", Duration::hours(24))
//!     .unwrap();
//! let context = authenticator
//!     .authenticate(&session.access_token, TokenKind::Access)
//!     .unwrap();
//! assert_eq!(context.subject, "alice@example.com");
//! ```

pub mod authenticator;
pub mod clock;
pub mod context;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use authenticator::SessionTokens;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use context::AuthenticatedContext;
pub use jwt::Claims;
pub use jwt::SigningKey;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::TokenKind;
pub use password::PasswordError;
pub use password::PasswordHasher;

use std::collections::HashMap;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::context::AuthenticatedContext;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::jwt::TokenKind;

/// Session coordinator on top of the token codec.
///
/// Mints access/refresh pairs after a caller has verified credentials, and
/// turns a presented token into an `AuthenticatedContext`.
pub struct Authenticator {
    codec: TokenCodec,
}

/// Tokens handed out by a successful sign-in or refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    /// JWT access token
    pub access_token: String,
    /// JWT refresh token
    pub refresh_token: String,
    /// Expiration of the access token
    pub expires_at: DateTime<Utc>,
}

impl Authenticator {
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issue an access token and a refresh token with the same lifetime.
    ///
    /// # Arguments
    /// * `subject` - Identity the tokens assert
    /// * `role` - Role placed in both tokens
    /// * `ttl` - Lifetime of each token
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue_session(
        &self,
        subject: &str,
        role: &str,
        ttl: Duration,
    ) -> Result<SessionTokens, TokenError> {
        let access_token = self.codec.issue(subject, role, ttl)?;
        let refresh_token = self
            .codec
            .issue_refresh(subject, role, HashMap::new(), ttl)?;
        let expires_at = self.codec.extract_expiration(&access_token)?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
            expires_at,
        })
    }

    /// Verify a presented token and build the request's identity from it.
    ///
    /// Checks run in order: structure and signature, expiration, kind.
    ///
    /// # Errors
    /// * `Malformed` / `SignatureInvalid` - Token cannot be trusted
    /// * `Expired` - Token was genuine but is past `exp`
    /// * `WrongKind` - A refresh token where an access token was expected, or vice versa
    pub fn authenticate(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> Result<AuthenticatedContext, TokenError> {
        let claims = self.codec.decode(token)?;

        if self.codec.is_expired(&claims) {
            return Err(TokenError::Expired);
        }

        if claims.token_type != expected {
            return Err(TokenError::WrongKind {
                expected,
                found: claims.token_type,
            });
        }

        AuthenticatedContext::try_from(claims)
    }
}

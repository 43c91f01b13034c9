use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::TokenError;
use crate::jwt::TokenKind;

/// Identity proven by a verified, unexpired token.
///
/// Produced per request by `Authenticator::authenticate` and passed by value
/// to whatever needs it; nothing global holds on to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedContext {
    pub subject: String,
    pub roles: Vec<String>,
    pub kind: TokenKind,
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedContext {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// First role in the token, if any.
    pub fn role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }
}

impl TryFrom<Claims> for AuthenticatedContext {
    type Error = TokenError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| TokenError::Malformed(format!("exp out of range: {}", claims.exp)))?;

        Ok(Self {
            subject: claims.sub,
            roles: claims.roles,
            kind: claims.token_type,
            expires_at,
        })
    }
}

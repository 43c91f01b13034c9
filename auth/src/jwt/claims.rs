use std::collections::HashMap;
use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claim names owned by the token codec; `with_extra` never overwrites them.
const RESERVED_CLAIMS: [&str; 5] = ["sub", "iat", "exp", "roles", "typ"];

/// What a token may be used for.
///
/// Access and refresh tokens share one claim layout; this marker keeps a
/// refresh token from being accepted where an access token is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Session token payload.
///
/// `sub`, `iat`, `exp` and `roles` are always present; anything else a
/// caller adds is flattened into the token through `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (normalized account email)
    pub sub: String,

    /// Issued at (Unix timestamp, seconds)
    pub iat: i64,

    /// Expiration time (Unix timestamp, seconds)
    pub exp: i64,

    /// Role names granted to the subject
    pub roles: Vec<String>,

    /// Access or refresh
    #[serde(rename = "typ")]
    pub token_type: TokenKind,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Claims {
    /// Create claims for `subject` valid from `issued_at` for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Identity the token asserts
    /// * `role` - Single role placed in the `roles` array
    /// * `kind` - Access or refresh
    /// * `issued_at` - Instant the token is minted
    /// * `ttl` - Lifetime added to `issued_at` to form `exp`
    pub fn new(
        subject: impl ToString,
        role: impl ToString,
        kind: TokenKind,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        let expiration = issued_at + ttl;

        Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            roles: vec![role.to_string()],
            token_type: kind,
            extra: HashMap::new(),
        }
    }

    /// Add a custom field.
    ///
    /// Reserved claim names are ignored, and so is a value that does not
    /// serialize to JSON (a map with non-string keys, for example). Check
    /// `extra` afterwards if the field must be present.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        let key = key.to_string();
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            return self;
        }
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key, json_value);
        }
        self
    }

    /// Merge a map of custom fields, skipping reserved names.
    pub fn with_extras(self, extra: HashMap<String, serde_json::Value>) -> Self {
        extra
            .into_iter()
            .fold(self, |claims, (key, value)| claims.with_extra(key, value))
    }

    /// First role in the token, if any.
    pub fn role(&self) -> Option<&str> {
        self.roles.first().map(String::as_str)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// True iff the expiration instant lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp.saturating_mul(1000) < now.timestamp_millis()
    }
}

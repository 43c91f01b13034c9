use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::claims::TokenKind;
use super::errors::TokenError;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Symmetric key material for HS256 signing.
///
/// Built once from configuration and never mutated; clone it to hand the
/// same key to several codecs.
#[derive(Clone)]
pub struct SigningKey {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningKey {
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

/// Encodes claims into signed compact tokens and verifies them back.
///
/// Stateless apart from the key and clock, so one instance can be shared
/// across tasks behind an `Arc`. Decoding checks structure and signature
/// only; expiration is a separate call so callers can tell a forged token
/// from a stale one.
#[derive(Clone)]
pub struct TokenCodec {
    key: SigningKey,
    algorithm: Algorithm,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    /// Create a codec using the system clock.
    pub fn new(key: SigningKey) -> Self {
        Self::with_clock(key, Arc::new(SystemClock))
    }

    /// Create a codec reading time from `clock`.
    pub fn with_clock(key: SigningKey, clock: Arc<dyn Clock>) -> Self {
        Self {
            key,
            algorithm: Algorithm::HS256,
            clock,
        }
    }

    /// Current instant according to the codec's clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Issue an access token for `subject` carrying `role`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed inside the JWT library
    pub fn issue(&self, subject: &str, role: &str, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims::new(subject, role, TokenKind::Access, self.now(), ttl);
        self.encode(&claims)
    }

    /// Issue a refresh token. Same layout as an access token plus `extra`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Signing failed inside the JWT library
    pub fn issue_refresh(
        &self,
        subject: &str,
        role: &str,
        extra: HashMap<String, serde_json::Value>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims =
            Claims::new(subject, role, TokenKind::Refresh, self.now(), ttl).with_extras(extra);
        self.encode(&claims)
    }

    /// Sign arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.key.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))
    }

    /// Parse and verify a token. Does not look at `exp`.
    ///
    /// # Errors
    /// * `Malformed` - Not three base64url segments, bad JSON, or missing claims
    /// * `SignatureInvalid` - MAC does not match this key
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;

        let token_data = decode::<Claims>(token, &self.key.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    pub fn is_expired(&self, claims: &Claims) -> bool {
        claims.is_expired(self.now())
    }

    /// Expiration instant of a verified token.
    ///
    /// # Errors
    /// Same as `decode`, plus `Malformed` if `exp` is out of range.
    pub fn extract_expiration(&self, token: &str) -> Result<DateTime<Utc>, TokenError> {
        let claims = self.decode(token)?;
        claims
            .expires_at()
            .ok_or_else(|| TokenError::Malformed(format!("exp out of range: {}", claims.exp)))
    }

    /// Verified, unexpired, and issued to exactly `expected_subject`.
    pub fn is_valid_for(&self, token: &str, expected_subject: &str) -> bool {
        match self.decode(token) {
            Ok(claims) => !self.is_expired(&claims) && claims.sub == expected_subject,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn codec() -> TokenCodec {
        TokenCodec::new(SigningKey::from_secret(SECRET))
    }

    fn codec_with_clock() -> (TokenCodec, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let codec = TokenCodec::with_clock(SigningKey::from_secret(SECRET), clock.clone());
        (codec, clock)
    }

    /// Replace one character of the signature segment with a different one.
    fn tamper_signature(token: &str, index_from_end: usize) -> String {
        let mut chars: Vec<char> = token.chars().collect();
        let position = chars.len() - 1 - index_from_end;
        chars[position] = if chars[position] == 'A' { 'B' } else { 'A' };
        chars.into_iter().collect()
    }

    #[test]
    fn test_issue_and_decode() {
        let codec = codec();

        let token = codec
            .issue("alice@example.com", "ADMIN", Duration::hours(24))
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let claims = codec.decode(&token).expect("Failed to decode token");
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.roles, vec!["ADMIN".to_string()]);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(claims.token_type, TokenKind::Access);
    }

    #[test]
    fn test_issue_refresh_carries_extra_claims() {
        let codec = codec();

        let mut extra = HashMap::new();
        extra.insert("device".to_string(), serde_json::json!("laptop"));

        let token = codec
            .issue_refresh("bob@example.com", "USER", extra, Duration::hours(24))
            .expect("Failed to issue refresh token");

        let claims = codec.decode(&token).expect("Failed to decode token");
        assert_eq!(claims.sub, "bob@example.com");
        assert_eq!(claims.token_type, TokenKind::Refresh);
        assert_eq!(claims.extra.get("device").unwrap(), "laptop");
    }

    #[test]
    fn test_decode_garbage_is_malformed() {
        let codec = codec();

        for token in ["", "invalid", "invalid.token.here", "a.b"] {
            let result = codec.decode(token);
            assert!(
                matches!(result, Err(TokenError::Malformed(_))),
                "{token:?} gave {result:?}"
            );
        }
    }

    #[test]
    fn test_decode_missing_claims_is_malformed() {
        let codec = codec();

        #[derive(serde::Serialize)]
        struct Partial {
            sub: String,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "bob".to_string(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert!(matches!(codec.decode(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let codec1 = TokenCodec::new(SigningKey::from_secret(b"secret1_at_least_32_bytes_long_key!"));
        let codec2 = TokenCodec::new(SigningKey::from_secret(b"secret2_at_least_32_bytes_long_key!"));

        let token = codec1
            .issue("user@example.com", "USER", Duration::hours(1))
            .expect("Failed to issue token");

        assert_eq!(codec2.decode(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_tampered_signature_is_rejected() {
        let codec = codec();
        let token = codec
            .issue("alice@example.com", "ADMIN", Duration::hours(24))
            .unwrap();
        let signature_length = token.rsplit('.').next().unwrap().len();

        for index in 0..signature_length {
            let tampered = tamper_signature(&token, index);
            assert_eq!(
                codec.decode(&tampered),
                Err(TokenError::SignatureInvalid),
                "tampering position {index} from the end was accepted"
            );
        }
    }

    #[test]
    fn test_truncated_signature_is_rejected() {
        let codec = codec();
        let token = codec.issue("alice@example.com", "ADMIN", Duration::hours(1)).unwrap();

        let truncated = &token[..token.len() - 5];
        assert_eq!(codec.decode(truncated), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_tampered_payload_is_rejected() {
        let codec = codec();
        let token = codec.issue("alice@example.com", "USER", Duration::hours(1)).unwrap();
        let forged_claims = Claims::new(
            "alice@example.com",
            "ADMIN",
            TokenKind::Access,
            Utc::now(),
            Duration::hours(1),
        );
        let forged_payload = TokenCodec::new(SigningKey::from_secret(b"other_key_other_key_other_key_32!"))
            .encode(&forged_claims)
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged_payload.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(codec.decode(&spliced), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn test_decode_does_not_check_expiration() {
        let (codec, clock) = codec_with_clock();

        let token = codec.issue("bob@example.com", "USER", Duration::seconds(10)).unwrap();
        clock.advance(Duration::hours(1));

        let claims = codec.decode(&token).expect("Expired token should still decode");
        assert!(codec.is_expired(&claims));
    }

    #[test]
    fn test_is_expired_follows_clock() {
        let (codec, clock) = codec_with_clock();
        let ttl = Duration::hours(24);

        let token = codec.issue("bob@example.com", "USER", ttl).unwrap();
        let claims = codec.decode(&token).unwrap();
        assert!(!codec.is_expired(&claims));

        clock.advance(ttl - Duration::seconds(1));
        assert!(!codec.is_expired(&claims));

        clock.advance(Duration::seconds(2));
        assert!(codec.is_expired(&claims));
    }

    #[test]
    fn test_extract_expiration() {
        let (codec, clock) = codec_with_clock();
        let issued_at = clock.now();

        let token = codec.issue("bob@example.com", "USER", Duration::hours(24)).unwrap();
        let expiration = codec.extract_expiration(&token).unwrap();

        assert_eq!(expiration.timestamp(), (issued_at + Duration::hours(24)).timestamp());
        assert!(matches!(
            codec.extract_expiration("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_is_valid_for() {
        let (codec, clock) = codec_with_clock();
        let token = codec.issue("alice@example.com", "USER", Duration::minutes(5)).unwrap();

        assert!(codec.is_valid_for(&token, "alice@example.com"));
        assert!(!codec.is_valid_for(&token, "ALICE@example.com"));
        assert!(!codec.is_valid_for(&token, "bob@example.com"));
        assert!(!codec.is_valid_for("garbage", "alice@example.com"));

        clock.advance(Duration::minutes(10));
        assert!(!codec.is_valid_for(&token, "alice@example.com"));
    }
}

//! Token codec: issue and verify signed, time-limited session tokens.
//!
//! HS256 over the process-wide secret. Tokens are stateless — the server
//! keeps no session table, so expiry and client-side deletion are the only
//! ways a token stops working.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Result, anyhow};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;

use shared::types::TokenClaims;

/// Current Unix timestamp in seconds.
pub fn unix_now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as usize
}

/// Sign a fresh token for `user_id`/`email`, valid for `ttl_secs`.
pub fn issue_token(user_id: i64, email: &str, ttl_secs: u64, secret: &str) -> Result<String> {
    let claims = TokenClaims::new(user_id, email, unix_now(), ttl_secs as usize);

    debug!("Issuing token for user_id={}", user_id);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| anyhow!("Token signing failed: {}", e))
}

/// Verify signature + expiry and return the decoded claims.
///
/// Fails on a bad signature, malformed structure, or elapsed expiry — the
/// caller cannot (and must not) distinguish which.
pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn issue_then_decode_roundtrip() {
        let token = issue_token(42, "ann@x.com", 3600, SECRET).unwrap();
        let claims = decode_token(&token, SECRET).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "ann@x.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token(42, "ann@x.com", 3600, SECRET).unwrap();
        assert!(decode_token(&token, "another-secret-another-secret-xx").is_err());
    }

    #[test]
    fn malformed_token_rejected() {
        assert!(decode_token("not-a-jwt", SECRET).is_err());
        assert!(decode_token("", SECRET).is_err());
        assert!(decode_token("a.b.c", SECRET).is_err());
    }

    #[test]
    fn expired_token_rejected() {
        // Default validation allows 60s of leeway; sign something well past it.
        let claims = TokenClaims {
            sub: "ann@x.com".into(),
            user_id: 42,
            iat: unix_now() - 7200,
            exp: unix_now() - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = decode_token(&token, SECRET).unwrap_err();
        assert_eq!(
            err.kind(),
            &jsonwebtoken::errors::ErrorKind::ExpiredSignature
        );
    }

    #[test]
    fn tampered_payload_rejected() {
        let token = issue_token(42, "ann@x.com", 3600, SECRET).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = issue_token(99, "mallory@x.com", 3600, SECRET).unwrap();
        let other_payload: Vec<&str> = other.split('.').collect();
        parts[1] = other_payload[1];
        let forged = parts.join(".");
        assert!(decode_token(&forged, SECRET).is_err());
    }
}

use serde::{Deserialize, Serialize};

/// Claims embedded in every session token issued by the server.
///
/// The token is stateless: nothing is stored server-side, so these fields
/// are the entire session. A token is valid iff its HMAC signature verifies
/// against the process-wide secret and `exp` has not elapsed. Rotating the
/// secret invalidates every outstanding token at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Standard JWT subject — set to the account email.
    pub sub: String,

    /// Numeric user ID (matches `users.id`).
    pub user_id: i64,

    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: usize,

    /// Issued-at (Unix timestamp, seconds).
    pub iat: usize,
}

impl TokenClaims {
    /// Build claims for a fresh session lasting `ttl_secs` from `now`.
    pub fn new(user_id: i64, email: &str, now: usize, ttl_secs: usize) -> Self {
        Self {
            sub: email.to_string(),
            user_id,
            iat: now,
            exp: now + ttl_secs,
        }
    }
}

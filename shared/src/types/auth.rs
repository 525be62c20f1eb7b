use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterData {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Response wire types
// ---------------------------------------------------------------------------

/// The public user shape — everything a client may see. The password hash
/// never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Body of a successful register (201) or login (200) response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSuccess {
    /// Signed session token — sent back as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: PublicUser,
}

/// Body of the protected `/dashboard/stats` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub user_count: i64,
}

// ---------------------------------------------------------------------------
// Auth errors
// ---------------------------------------------------------------------------

/// Every failure the auth surface can produce, mapped 1:1 onto a wire code.
///
/// `InvalidCredentials` is deliberately shared between "no such email" and
/// "wrong password" — callers must not be able to tell which check failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    Validation(String),
    EmailTaken,
    InvalidCredentials,
    InvalidToken,
    UserNotFound,
    DatabaseError,
    InternalError,
}

impl AuthError {
    pub fn to_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn to_message(&self) -> String {
        match self {
            Self::Validation(detail) => detail.clone(),
            Self::EmailTaken => "Email already registered".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::InvalidToken => "Invalid token".to_string(),
            Self::UserNotFound => "User not found".to_string(),
            // Store and hash failures are collapsed to a generic message so
            // no internal detail reaches the client.
            Self::DatabaseError | Self::InternalError => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// HTTP status this error maps to on the wire.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::EmailTaken => 400,
            Self::InvalidCredentials => 401,
            Self::InvalidToken => 403,
            Self::UserNotFound => 404,
            Self::DatabaseError | Self::InternalError => 500,
        }
    }

    pub fn to_response(&self) -> super::ErrorResponse {
        super::ErrorResponse::new(self.to_code(), &self.to_message())
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.to_code(), self.to_message())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_credentials_maps_to_401() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
    }

    #[test]
    fn invalid_token_maps_to_403() {
        assert_eq!(AuthError::InvalidToken.status_code(), 403);
    }

    #[test]
    fn conflict_maps_to_400() {
        assert_eq!(AuthError::EmailTaken.status_code(), 400);
    }

    #[test]
    fn internal_errors_never_leak_detail() {
        assert_eq!(AuthError::DatabaseError.to_message(), "An internal error occurred");
        assert_eq!(AuthError::InternalError.to_message(), "An internal error occurred");
    }

    #[test]
    fn validation_message_carries_detail() {
        let e = AuthError::Validation("Password must be at least 6 characters".into());
        assert!(e.to_message().contains("6 characters"));
    }
}

use anyhow::Result;
use bytes::Bytes;
use http_body_util::BodyExt;
use http_body_util::combinators::BoxBody;
use hyper::body::Body;
use hyper::{Request, Response, StatusCode};
use sqlx::SqlitePool;
use std::convert::Infallible;
use tracing::{error, info, warn};

use crate::AppState;
use crate::database::{password, users};
use crate::handlers::http::auth::register::is_valid_email;
use crate::handlers::http::utils::{
    deliver_auth_error, deliver_serialized_json, is_json_request, issue_token,
};

use shared::types::{AuthError, AuthSuccess, LoginData, PublicUser};

/// Main login handler
pub async fn handle_login<B: Body>(
    req: Request<B>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing login request");

    let data = match parse_login(req).await {
        Ok(data) => data,
        Err(err) => {
            warn!("Login parsing failed: {}", err.to_code());
            return deliver_auth_error(&err);
        }
    };

    if let Err(err) = validate_login(&data) {
        warn!("Login validation failed: {}", err.to_code());
        return deliver_auth_error(&err);
    }

    match attempt_login(&data, &state.db).await {
        Ok(user) => {
            let token = match issue_token(
                user.id,
                &user.email,
                state.config.auth.token_expiry_secs(),
                &state.jwt_secret,
            ) {
                Ok(token) => token,
                Err(err) => {
                    error!("Token signing error: {}", err);
                    return deliver_auth_error(&AuthError::InternalError);
                }
            };

            info!("User logged in: {} (ID: {})", user.email, user.id);

            deliver_serialized_json(&AuthSuccess { token, user }, StatusCode::OK)
        }
        Err(err) => {
            warn!("Login failed: {}", err.to_code());
            deliver_auth_error(&err)
        }
    }
}

/// Parse the JSON request body. Same content-type gate as registration.
async fn parse_login<B: Body>(req: Request<B>) -> Result<LoginData, AuthError> {
    if !is_json_request(&req) {
        return Err(AuthError::Validation(
            "Expected an application/json request body".to_string(),
        ));
    }

    let body = req
        .collect()
        .await
        .map_err(|_| AuthError::InternalError)?
        .to_bytes();

    serde_json::from_slice::<LoginData>(&body)
        .map_err(|e| AuthError::Validation(format!("Malformed request body: {}", e)))
}

/// Validate login shape before touching the store.
pub fn validate_login(data: &LoginData) -> Result<(), AuthError> {
    if !is_valid_email(&data.email) {
        return Err(AuthError::Validation("Invalid email address".to_string()));
    }

    if data.password.chars().count() < 6 {
        return Err(AuthError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    Ok(())
}

/// Verify credentials against the store.
///
/// Unknown email and wrong password both collapse to `InvalidCredentials` —
/// the response must not reveal which check failed.
pub async fn attempt_login(data: &LoginData, pool: &SqlitePool) -> Result<PublicUser, AuthError> {
    let auth = users::get_auth_by_email(pool, &data.email)
        .await
        .map_err(|e| {
            error!("Database error getting user auth: {}", e);
            AuthError::DatabaseError
        })?
        .ok_or(AuthError::InvalidCredentials)?;

    let password_valid =
        password::verify_password(&auth.password_hash, &data.password).map_err(|e| {
            error!("Password verification error: {}", e);
            AuthError::InternalError
        })?;

    if !password_valid {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(PublicUser {
        id: auth.id,
        name: auth.name,
        email: auth.email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::handlers::http::auth::register::attempt_register;
    use shared::types::RegisterData;

    async fn seed_ann(pool: &SqlitePool) -> PublicUser {
        let data = RegisterData {
            name: "Ann".into(),
            email: "ann@x.com".into(),
            password: "secret1".into(),
        };
        let hash = password::hash_password(&data.password).unwrap();
        attempt_register(&data, &hash, pool).await.unwrap()
    }

    fn login(email: &str, pw: &str) -> LoginData {
        LoginData {
            email: email.into(),
            password: pw.into(),
        }
    }

    // ── Validation ────────────────────────────────────────────────────────────

    #[test]
    fn malformed_email_rejected_before_store() {
        assert!(validate_login(&login("not-an-email", "secret1")).is_err());
    }

    #[test]
    fn short_password_rejected_before_store() {
        assert!(validate_login(&login("ann@x.com", "12345")).is_err());
    }

    // ── Credential checks ─────────────────────────────────────────────────────

    #[tokio::test]
    async fn register_then_login_returns_same_user_id() {
        let pool = test_pool().await;
        let registered = seed_ann(&pool).await;
        let logged_in = attempt_login(&login("ann@x.com", "secret1"), &pool)
            .await
            .unwrap();
        assert_eq!(logged_in.id, registered.id);
        assert_eq!(logged_in.name, "Ann");
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_indistinguishable() {
        let pool = test_pool().await;
        seed_ann(&pool).await;

        let wrong_pw = attempt_login(&login("ann@x.com", "wrong-pass"), &pool)
            .await
            .unwrap_err();
        let unknown = attempt_login(&login("ghost@x.com", "secret1"), &pool)
            .await
            .unwrap_err();

        assert_eq!(wrong_pw, AuthError::InvalidCredentials);
        assert_eq!(unknown, AuthError::InvalidCredentials);
        // Same code, same message, same status — nothing to fingerprint.
        assert_eq!(wrong_pw.to_message(), unknown.to_message());
        assert_eq!(wrong_pw.status_code(), unknown.status_code());
    }
}

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
use crate::handlers::http::utils::{
    deliver_auth_error, deliver_serialized_json, is_json_request, issue_token,
};

use shared::types::{AuthError, AuthSuccess, PublicUser, RegisterData};

/// Main registration handler.
///
/// Flow: parse → validate → hash → insert → issue token. The plaintext
/// password exists only on the stack of this call; it is hashed before any
/// store interaction and never logged.
pub async fn handle_register<B: Body>(
    req: Request<B>,
    state: AppState,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing register request");

    let data = match parse_register(req).await {
        Ok(data) => data,
        Err(err) => {
            warn!("Register parsing failed: {}", err.to_code());
            return deliver_auth_error(&err);
        }
    };

    if let Err(err) = validate_register(&data) {
        warn!("Register validation failed: {}", err.to_code());
        return deliver_auth_error(&err);
    }

    let hashed_password = match password::hash_password(&data.password) {
        Ok(hash) => hash,
        Err(err) => {
            error!("Password hashing error: {}", err);
            return deliver_auth_error(&AuthError::InternalError);
        }
    };

    match attempt_register(&data, &hashed_password, &state.db).await {
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

            info!("User registered: {} (ID: {})", user.email, user.id);

            deliver_serialized_json(&AuthSuccess { token, user }, StatusCode::CREATED)
        }
        Err(err) => {
            warn!("Register failed: {}", err.to_code());
            deliver_auth_error(&err)
        }
    }
}

/// Parse the JSON request body. The content type must declare JSON before
/// any bytes are read.
async fn parse_register<B: Body>(req: Request<B>) -> Result<RegisterData, AuthError> {
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

    serde_json::from_slice::<RegisterData>(&body)
        .map_err(|e| AuthError::Validation(format!("Malformed request body: {}", e)))
}

/// Validate registration constraints: name ≥ 2, valid email, password ≥ 6.
pub fn validate_register(data: &RegisterData) -> Result<(), AuthError> {
    if data.name.trim().chars().count() < 2 {
        return Err(AuthError::Validation(
            "Name must be at least 2 characters".to_string(),
        ));
    }

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

/// Basic email syntax check: one `@`, non-empty local part, dotted domain.
pub(crate) fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let domain_parts: Vec<&str> = parts[1].split('.').collect();
    if domain_parts.len() < 2 {
        return false;
    }
    !parts[0].is_empty() && domain_parts.iter().all(|p| !p.is_empty())
}

/// Insert the user, enforcing email uniqueness.
pub async fn attempt_register(
    data: &RegisterData,
    hashed_password: &str,
    pool: &SqlitePool,
) -> Result<PublicUser, AuthError> {
    let email_exists = users::email_exists(pool, &data.email).await.map_err(|e| {
        error!("Database error checking email: {}", e);
        AuthError::DatabaseError
    })?;

    if email_exists {
        warn!("Email already registered: {}", data.email);
        return Err(AuthError::EmailTaken);
    }

    let user_id = users::insert_user(
        pool,
        users::NewUser {
            name: data.name.clone(),
            email: data.email.clone(),
            password_hash: hashed_password.to_string(),
        },
    )
    .await
    .map_err(|e| {
        // The UNIQUE index catches the race two concurrent registrations
        // can win past the pre-check above.
        if e.as_database_error()
            .map(|db| db.is_unique_violation())
            .unwrap_or(false)
        {
            warn!("Email already registered (index): {}", data.email);
            AuthError::EmailTaken
        } else {
            error!("Database error creating user: {}", e);
            AuthError::DatabaseError
        }
    })?;

    Ok(PublicUser {
        id: user_id,
        name: data.name.clone(),
        email: data.email.clone(),
    })
}

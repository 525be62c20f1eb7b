use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use tracing::{error, info};

use crate::AppState;
use crate::database::users;
use crate::handlers::http::utils::{deliver_auth_error, deliver_serialized_json};

use shared::types::{AuthError, PublicUser, TokenClaims};

/// Resolve the bearer identity to the current user record.
///
/// The router has already verified the token; this handler only has to map
/// the claims back to a row. A valid token whose user has since disappeared
/// yields 404 — the token outlived the account.
pub async fn handle_me<B>(
    _req: Request<B>,
    state: AppState,
    claims: TokenClaims,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    info!("Processing identity lookup for user_id={}", claims.user_id);

    let user = match users::get_user_by_id(&state.db, claims.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return deliver_auth_error(&AuthError::UserNotFound),
        Err(e) => {
            error!("Database error on identity lookup: {}", e);
            return deliver_auth_error(&AuthError::DatabaseError);
        }
    };

    let public = PublicUser {
        id: user.id,
        name: user.name,
        email: user.email,
    };

    deliver_serialized_json(&public, StatusCode::OK)
}

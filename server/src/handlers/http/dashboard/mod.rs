use anyhow::Result;
use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::{Request, Response, StatusCode};
use std::convert::Infallible;
use tracing::error;

use crate::AppState;
use crate::database::users;
use crate::handlers::http::utils::{deliver_auth_error, deliver_serialized_json};

use shared::types::{AuthError, StatsResponse, TokenClaims};

/// Sample protected data for the dashboard overview card.
pub async fn handle_stats<B>(
    _req: Request<B>,
    state: AppState,
    _claims: TokenClaims,
) -> Result<Response<BoxBody<Bytes, Infallible>>> {
    let user_count = match users::count_users(&state.db).await {
        Ok(count) => count,
        Err(e) => {
            error!("Database error counting users: {}", e);
            return deliver_auth_error(&AuthError::DatabaseError);
        }
    };

    deliver_serialized_json(&StatsResponse { user_count }, StatusCode::OK)
}

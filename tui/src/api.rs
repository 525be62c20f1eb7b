//! HTTP client for the auth service.
//!
//! The interceptor pattern from the router's mirror image: every request
//! attaches `Authorization: Bearer <token>` when a token is stored (the
//! header is omitted entirely otherwise), and any 401 response clears the
//! stored token, implicit logout, never an automatic retry.

use std::fmt;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use shared::types::{AuthSuccess, ErrorResponse, LoginData, PublicUser, RegisterData, StatsResponse};

use crate::session::SessionStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum ApiError {
    /// The server answered with an error envelope; `message` is surfaced to
    /// the user verbatim.
    Server { status: u16, message: String },
    /// The request never produced a response.
    Network(String),
    /// The token file could not be written.
    Storage(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::Network(detail) => format!("Could not reach the server: {}", detail),
            Self::Storage(detail) => format!("Could not persist the session: {}", detail),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: String, store: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // ── Auth operations ───────────────────────────────────────────────────────

    /// Register and persist the returned token on success.
    pub async fn register(&self, data: &RegisterData) -> Result<AuthSuccess, ApiError> {
        let success: AuthSuccess = self
            .send(self.http.post(self.url("/auth/register")).json(data))
            .await?;
        self.store
            .save(&success.token)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(success)
    }

    /// Login and persist the returned token on success.
    pub async fn login(&self, data: &LoginData) -> Result<AuthSuccess, ApiError> {
        let success: AuthSuccess = self
            .send(self.http.post(self.url("/auth/login")).json(data))
            .await?;
        self.store
            .save(&success.token)
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        Ok(success)
    }

    /// Resolve the stored token to the current identity.
    pub async fn me(&self) -> Result<PublicUser, ApiError> {
        self.send(self.http.get(self.url("/auth/me"))).await
    }

    pub async fn stats(&self) -> Result<StatsResponse, ApiError> {
        self.send(self.http.get(self.url("/dashboard/stats"))).await
    }

    /// Drop the persisted token unconditionally.
    pub fn logout(&self) {
        self.store.clear();
    }

    // ── Plumbing ──────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Attach the bearer header when a token is present, send, and decode.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let request = self.attach_bearer(request);

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();

        // Any 401 means the session is gone, clear the token so the next
        // launch (and the guard) sees an unauthenticated state. No retry.
        if status == StatusCode::UNAUTHORIZED {
            warn!("Received 401, clearing stored token");
            self.store.clear();
        }

        if status.is_success() {
            debug!("Request succeeded with status {}", status);
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Network(format!("Malformed response body: {}", e)))
        } else {
            // Surface the server-provided message verbatim when the body is
            // a well-formed error envelope.
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
            Err(ApiError::Server {
                status: status.as_u16(),
                message,
            })
        }
    }

    fn attach_bearer(&self, request: RequestBuilder) -> RequestBuilder {
        match self.store.load() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;

use anyhow::{Context, Result};
use bytes::Bytes;
use http_body_util::{BodyExt, combinators::BoxBody};
use hyper::body::Body;
use hyper::{Method, Request, Response, StatusCode};
use tracing::warn;

use crate::AppState;
use crate::handlers::http::utils::{decode_token, get_bearer_token, json_response};
use crate::handlers::http::{auth, dashboard};

use shared::types::TokenClaims;

// ---------------------------------------------------------------------------
// Handler type aliases
// ---------------------------------------------------------------------------
//
// Two security tiers:
//
//   RouteHandler   — no auth.  Receives (req, state).
//                    Use for: /auth/login, /auth/register, /health.
//
//   AuthedHandler  — bearer token verified (signature + expiry) before the
//                    handler runs.  Receives (req, state, claims).
//                    Use for: everything else.
//
// The router is generic over the body type so the same dispatch logic serves
// live `hyper::body::Incoming` connections and buffered bodies in tests.

type HandlerResponse = Response<BoxBody<Bytes, Infallible>>;

type RouteHandler<B> = Box<
    dyn Fn(
            Request<B>,
            AppState,
        ) -> Pin<Box<dyn Future<Output = Result<HandlerResponse>> + Send>>
        + Send
        + Sync,
>;

type AuthedHandler<B> = Box<
    dyn Fn(
            Request<B>,
            AppState,
            TokenClaims, // decoded and verified by the router
        ) -> Pin<Box<dyn Future<Output = Result<HandlerResponse>> + Send>>
        + Send
        + Sync,
>;

// ---------------------------------------------------------------------------
// RouteKind
// ---------------------------------------------------------------------------

enum RouteKind<B> {
    /// No authentication check.
    Open(RouteHandler<B>),

    /// Bearer auth: token extracted and verified before dispatch.
    /// Handler receives the decoded `TokenClaims`.
    Protected(AuthedHandler<B>),
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

struct Route<B> {
    method: Method,
    path: String,
    kind: RouteKind<B>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub struct Router<B = hyper::body::Incoming> {
    routes: Vec<Route<B>>,
}

impl<B> std::fmt::Debug for Router<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("routes_count", &self.routes.len())
            .finish()
    }
}

impl<B> Router<B> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    // ── Open (no auth) ────────────────────────────────────────────────────────

    /// GET with no authentication — use for health checks only.
    pub fn get<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<B>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::GET,
            path: path.to_string(),
            kind: RouteKind::Open(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    /// POST with no authentication — use only for login / register.
    pub fn post<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<B>, AppState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::POST,
            path: path.to_string(),
            kind: RouteKind::Open(Box::new(move |req, state| Box::pin(handler(req, state)))),
        });
        self
    }

    // ── Protected (bearer token, verified before dispatch) ────────────────────
    //
    // The router extracts and verifies the bearer token before the handler is
    // called.  Handlers receive `TokenClaims` and must NOT call `decode_token`
    // themselves — the work is already done.  No handler code runs on an
    // unauthenticated request.

    /// GET guarded by bearer auth.
    pub fn get_protected<F, Fut>(mut self, path: &str, handler: F) -> Self
    where
        F: Fn(Request<B>, AppState, TokenClaims) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<HandlerResponse>> + Send + 'static,
    {
        self.routes.push(Route {
            method: Method::GET,
            path: path.to_string(),
            kind: RouteKind::Protected(Box::new(move |req, state, claims| {
                Box::pin(handler(req, state, claims))
            })),
        });
        self
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    pub async fn route(&self, req: Request<B>, state: AppState) -> Result<HandlerResponse> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        for route in &self.routes {
            if route.method != method || !path_matches(&route.path, &path) {
                continue;
            }

            return match &route.kind {
                // ── Open ──────────────────────────────────────────────────────
                RouteKind::Open(h) => h(req, state).await,

                // ── Protected: missing token is 401, bad token is 403 ─────────
                RouteKind::Protected(h) => match get_bearer_token(&req) {
                    None => {
                        warn!("Rejected {} {}: no bearer token", method, path);
                        unauthorized()
                    }
                    Some(token) => match decode_token(&token, &state.jwt_secret) {
                        Ok(claims) => h(req, state, claims).await,
                        Err(reason) => {
                            warn!("Rejected {} {}: {}", method, path, reason);
                            forbidden()
                        }
                    },
                },
            };
        }

        json_response::deliver_error_json("NOT_FOUND", "Endpoint not found", StatusCode::NOT_FOUND)
            .context("Failed to deliver 404 response")
    }
}

impl<B> Default for Router<B> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Path matching
// ---------------------------------------------------------------------------

pub fn path_matches(route_path: &str, request_path: &str) -> bool {
    // Strip query string from incoming request path before comparing.
    let clean = request_path.split('?').next().unwrap_or(request_path);
    route_path == clean
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn unauthorized() -> Result<HandlerResponse> {
    json_response::deliver_error_json(
        "UNAUTHORIZED",
        "Access denied. No token provided.",
        StatusCode::UNAUTHORIZED,
    )
    .context("Failed to deliver 401 response")
}

fn forbidden() -> Result<HandlerResponse> {
    json_response::deliver_error_json("INVALID_TOKEN", "Invalid token", StatusCode::FORBIDDEN)
        .context("Failed to deliver 403 response")
}

// ---------------------------------------------------------------------------
// API router
//
// Auth tier is enforced here at the routing level — handlers MUST NOT repeat
// the auth call.  The contract is:
//
//   .get(...)            → Open       — handler gets (req, state)
//   .post(...)           → Open       — login / register only
//   .get_protected(...)  → Protected  — handler gets (req, state, claims)
// ---------------------------------------------------------------------------

pub fn build_api_router<B>() -> Router<B>
where
    B: Body + Send + 'static,
    B::Data: Send,
    B::Error: Send,
{
    Router::new()
        // ── Public: no auth ──────────────────────────────────────────────────
        //
        // These are the only routes where auth is intentionally absent.
        .get("/health", |_req, _state| async move {
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("content-type", "application/json")
                .body(
                    http_body_util::Full::new(Bytes::from(r#"{"status":"success","health":"ok"}"#))
                        .boxed(),
                )
                .context("Failed to build health response")?)
        })
        .post("/auth/register", |req, state| async move {
            auth::handle_register(req, state)
                .await
                .context("Register failed")
        })
        .post("/auth/login", |req, state| async move {
            auth::handle_login(req, state).await.context("Login failed")
        })
        // ── Protected: bearer token verified by the router ────────────────────
        .get_protected("/auth/me", |req, state, claims| async move {
            auth::handle_me(req, state, claims)
                .await
                .context("Identity lookup failed")
        })
        .get_protected("/dashboard/stats", |req, state, claims| async move {
            dashboard::handle_stats(req, state, claims)
                .await
                .context("Stats failed")
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
